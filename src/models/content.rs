//! CMS-editable site content.
//!
//! Every struct is `#[serde(default)]`, so any stored or submitted document
//! deserializes with the missing keys taken from the defaults below. Keys
//! outside these structs are not modelled here; the content service keeps
//! them in the stored JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteContent {
    pub hero: Hero,
    pub gallery: Vec<GalleryImage>,
    pub pricing: Pricing,
    pub reviews: Vec<Review>,
    pub faq: Vec<FaqItem>,
    pub contact: Contact,
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            hero: Hero::default(),
            gallery: vec![GalleryImage {
                src: "/uploads/chata-exterior.jpg".to_string(),
                alt: "Chata v zimě".to_string(),
                caption: String::new(),
            }],
            pricing: Pricing::default(),
            reviews: Vec::new(),
            faq: vec![
                FaqItem {
                    question: "Kdy je check-in a check-out?".to_string(),
                    answer: "Check-in od 15:00, check-out do 10:00.".to_string(),
                },
                FaqItem {
                    question: "Jsou povolena zvířata?".to_string(),
                    answer: "Po domluvě ano.".to_string(),
                },
            ],
            contact: Contact::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub cta_label: String,
    pub background_image: String,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            title: "Chata pod horami".to_string(),
            subtitle: "Klid, příroda a sauna pro až 8 hostů".to_string(),
            cta_label: "Rezervovat".to_string(),
            background_image: "/uploads/hero.jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pricing {
    pub currency: String,
    pub note: String,
    pub packages: Vec<PricingPackage>,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            currency: "EUR".to_string(),
            note: "Ceny jsou za celou chatu a noc.".to_string(),
            packages: vec![
                PricingPackage {
                    name: "Mimosezóna".to_string(),
                    price: 120,
                    description: "Duben, květen, říjen, listopad".to_string(),
                    features: vec!["Min. 2 noci".to_string()],
                },
                PricingPackage {
                    name: "Sezóna".to_string(),
                    price: 150,
                    description: "Zima, červen a září".to_string(),
                    features: vec!["Min. 2 noci".to_string()],
                },
                PricingPackage {
                    name: "Hlavní sezóna".to_string(),
                    price: 190,
                    description: "Červenec, srpen a svátky".to_string(),
                    features: vec!["Min. 3 noci".to_string(), "Svátky min. 4 noci".to_string()],
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingPackage {
    pub name: String,
    pub price: u32,
    pub description: String,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    pub rating: u8,
    pub text: String,
    pub source: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub address: String,
    pub map_url: String,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            phone: "+420 000 000 000".to_string(),
            email: "info@chata.local".to_string(),
            address: String::new(),
            map_url: String::new(),
        }
    }
}

/// One stored backup of the content document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBackup {
    pub name: String,
    pub created_at: String,
    pub size_bytes: u64,
}
