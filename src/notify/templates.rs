//! Localized e-mail texts.

use std::fmt::Write;

use super::EmailMessage;
use crate::calendar::iso;
use crate::models::{BookingInquiry, ContactMessage, Language};

/// Sender and owner addresses used for every message.
#[derive(Debug, Clone)]
pub struct Mailboxes {
    pub from: String,
    pub owner: String,
}

struct Labels {
    booking_subject: &'static str,
    contact_subject: &'static str,
    confirm_booking_subject: &'static str,
    confirm_contact_subject: &'static str,
    greeting: &'static str,
    booking_thanks: &'static str,
    contact_thanks: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    guests: &'static str,
    check_in: &'static str,
    check_out: &'static str,
    nights: &'static str,
    price: &'static str,
    note: &'static str,
    message: &'static str,
    signature: &'static str,
}

fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Cs => &Labels {
            booking_subject: "Nová poptávka rezervace",
            contact_subject: "Nová zpráva z webu",
            confirm_booking_subject: "Potvrzení přijetí poptávky",
            confirm_contact_subject: "Děkujeme za zprávu",
            greeting: "Dobrý den",
            booking_thanks: "děkujeme za poptávku. Ozveme se vám co nejdříve s potvrzením termínu.",
            contact_thanks: "děkujeme za zprávu. Odpovíme vám co nejdříve.",
            name: "Jméno",
            email: "E-mail",
            phone: "Telefon",
            guests: "Počet hostů",
            check_in: "Příjezd",
            check_out: "Odjezd",
            nights: "Počet nocí",
            price: "Orientační cena",
            note: "Poznámka",
            message: "Zpráva",
            signature: "Tým chaty",
        },
        Language::En => &Labels {
            booking_subject: "New booking inquiry",
            contact_subject: "New message from the website",
            confirm_booking_subject: "We received your booking inquiry",
            confirm_contact_subject: "Thank you for your message",
            greeting: "Hello",
            booking_thanks: "thank you for your inquiry. We will get back to you shortly to confirm the dates.",
            contact_thanks: "thank you for your message. We will reply as soon as possible.",
            name: "Name",
            email: "E-mail",
            phone: "Phone",
            guests: "Guests",
            check_in: "Check-in",
            check_out: "Check-out",
            nights: "Nights",
            price: "Estimated price",
            note: "Note",
            message: "Message",
            signature: "The chata team",
        },
        Language::De => &Labels {
            booking_subject: "Neue Buchungsanfrage",
            contact_subject: "Neue Nachricht von der Webseite",
            confirm_booking_subject: "Ihre Buchungsanfrage ist eingegangen",
            confirm_contact_subject: "Vielen Dank für Ihre Nachricht",
            greeting: "Guten Tag",
            booking_thanks: "vielen Dank für Ihre Anfrage. Wir melden uns in Kürze mit einer Bestätigung des Termins.",
            contact_thanks: "vielen Dank für Ihre Nachricht. Wir antworten so bald wie möglich.",
            name: "Name",
            email: "E-Mail",
            phone: "Telefon",
            guests: "Gäste",
            check_in: "Anreise",
            check_out: "Abreise",
            nights: "Nächte",
            price: "Voraussichtlicher Preis",
            note: "Anmerkung",
            message: "Nachricht",
            signature: "Ihr Chata-Team",
        },
        Language::Pl => &Labels {
            booking_subject: "Nowe zapytanie o rezerwację",
            contact_subject: "Nowa wiadomość ze strony",
            confirm_booking_subject: "Otrzymaliśmy Twoje zapytanie",
            confirm_contact_subject: "Dziękujemy za wiadomość",
            greeting: "Dzień dobry",
            booking_thanks: "dziękujemy za zapytanie. Wkrótce skontaktujemy się w celu potwierdzenia terminu.",
            contact_thanks: "dziękujemy za wiadomość. Odpowiemy najszybciej, jak to możliwe.",
            name: "Imię i nazwisko",
            email: "E-mail",
            phone: "Telefon",
            guests: "Liczba gości",
            check_in: "Przyjazd",
            check_out: "Wyjazd",
            nights: "Liczba nocy",
            price: "Szacunkowa cena",
            note: "Uwagi",
            message: "Wiadomość",
            signature: "Zespół chaty",
        },
    }
}

fn booking_details(inquiry: &BookingInquiry, l: &Labels) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}: {}", l.check_in, iso(inquiry.check_in));
    let _ = writeln!(text, "{}: {}", l.check_out, iso(inquiry.check_out));
    let _ = writeln!(text, "{}: {}", l.nights, inquiry.nights);
    let _ = writeln!(text, "{}: {}", l.guests, inquiry.guests);
    let _ = writeln!(
        text,
        "{}: {} {}",
        l.price, inquiry.estimated_price, inquiry.currency
    );
    if let Some(note) = &inquiry.note {
        let _ = writeln!(text, "{}: {}", l.note, note);
    }
    text
}

/// Owner notification of a booking inquiry.
pub fn booking_owner_email(inquiry: &BookingInquiry, mailboxes: &Mailboxes) -> EmailMessage {
    let l = labels(inquiry.language);
    let mut text = String::new();
    let _ = writeln!(text, "{}: {}", l.name, inquiry.name);
    let _ = writeln!(text, "{}: {}", l.email, inquiry.email);
    let _ = writeln!(text, "{}: {}", l.phone, inquiry.phone);
    text.push_str(&booking_details(inquiry, l));
    let _ = writeln!(text, "\n[{}]", inquiry.language.as_str());

    EmailMessage {
        from: mailboxes.from.clone(),
        to: mailboxes.owner.clone(),
        reply_to: Some(inquiry.email.clone()),
        subject: format!(
            "{}: {} – {}",
            l.booking_subject,
            iso(inquiry.check_in),
            iso(inquiry.check_out)
        ),
        text,
    }
}

/// Confirmation sent to the guest.
pub fn booking_confirmation_email(inquiry: &BookingInquiry, mailboxes: &Mailboxes) -> EmailMessage {
    let l = labels(inquiry.language);
    let text = format!(
        "{} {},\n\n{}\n\n{}\n{}\n",
        l.greeting,
        inquiry.name,
        l.booking_thanks,
        booking_details(inquiry, l),
        l.signature
    );

    EmailMessage {
        from: mailboxes.from.clone(),
        to: inquiry.email.clone(),
        reply_to: Some(mailboxes.owner.clone()),
        subject: l.confirm_booking_subject.to_string(),
        text,
    }
}

pub fn contact_owner_email(message: &ContactMessage, mailboxes: &Mailboxes) -> EmailMessage {
    let l = labels(message.language);
    let text = format!(
        "{}: {}\n{}: {}\n\n{}:\n{}\n\n[{}]\n",
        l.name,
        message.name,
        l.email,
        message.email,
        l.message,
        message.message,
        message.language.as_str()
    );

    EmailMessage {
        from: mailboxes.from.clone(),
        to: mailboxes.owner.clone(),
        reply_to: Some(message.email.clone()),
        subject: format!("{}: {}", l.contact_subject, message.name),
        text,
    }
}

pub fn contact_confirmation_email(message: &ContactMessage, mailboxes: &Mailboxes) -> EmailMessage {
    let l = labels(message.language);
    EmailMessage {
        from: mailboxes.from.clone(),
        to: message.email.clone(),
        reply_to: Some(mailboxes.owner.clone()),
        subject: l.confirm_contact_subject.to_string(),
        text: format!(
            "{} {},\n\n{}\n\n{}\n",
            l.greeting, message.name, l.contact_thanks, l.signature
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_iso;

    fn mailboxes() -> Mailboxes {
        Mailboxes {
            from: "rezervace@chata.local".to_string(),
            owner: "owner@chata.local".to_string(),
        }
    }

    fn inquiry(language: Language) -> BookingInquiry {
        BookingInquiry {
            name: "Anna".to_string(),
            email: "anna@example.de".to_string(),
            phone: "+49 170 000".to_string(),
            guests: 3,
            note: None,
            gdpr_consent: true,
            check_in: parse_iso("2025-07-10").unwrap(),
            check_out: parse_iso("2025-07-13").unwrap(),
            nights: 3,
            estimated_price: 570,
            currency: "EUR".to_string(),
            language,
        }
    }

    #[test]
    fn test_booking_emails_are_localized() {
        let owner = booking_owner_email(&inquiry(Language::De), &mailboxes());
        assert_eq!(owner.to, "owner@chata.local");
        assert_eq!(owner.reply_to.as_deref(), Some("anna@example.de"));
        assert!(owner.subject.starts_with("Neue Buchungsanfrage"));
        assert!(owner.text.contains("Anreise: 2025-07-10"));
        assert!(owner.text.contains("570 EUR"));

        let guest = booking_confirmation_email(&inquiry(Language::En), &mailboxes());
        assert_eq!(guest.to, "anna@example.de");
        assert_eq!(guest.subject, "We received your booking inquiry");
        assert!(guest.text.starts_with("Hello Anna,"));
    }

    #[test]
    fn test_contact_emails() {
        let message = ContactMessage {
            name: "Piotr".to_string(),
            email: "piotr@example.pl".to_string(),
            message: "Czy jest sauna?".to_string(),
            gdpr_consent: true,
            language: Language::Pl,
        };

        let owner = contact_owner_email(&message, &mailboxes());
        assert!(owner.text.contains("Czy jest sauna?"));
        assert_eq!(owner.subject, "Nowa wiadomość ze strony: Piotr");

        let confirmation = contact_confirmation_email(&message, &mailboxes());
        assert_eq!(confirmation.to, "piotr@example.pl");
        assert_eq!(confirmation.subject, "Dziękujemy za wiadomość");
    }
}
