use crate::users::{Gender, User};

const CRLF: &str = "\r\n";

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

fn push_line(card: &mut String, name: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    card.push_str(&format!("{}:{}{}", name, escape(value), CRLF));
}

impl User {
    /// Serializes the user as a vCard 3.0 contact card.
    pub fn vcard(&self) -> String {
        let mut card = String::with_capacity(256);
        card.push_str("BEGIN:VCARD");
        card.push_str(CRLF);
        card.push_str("VERSION:3.0");
        card.push_str(CRLF);
        card.push_str(&format!(
            "N:{};{};;;{}",
            escape(&self.last_name),
            escape(&self.first_name),
            CRLF
        ));
        push_line(&mut card, "FN", self.full_name().trim());
        push_line(&mut card, "NICKNAME", &self.login);
        push_line(&mut card, "TEL;TYPE=HOME,VOICE", &self.phone);
        push_line(&mut card, "TEL;TYPE=CELL", &self.mobile);
        push_line(&mut card, "TEL;TYPE=FAX", &self.fax);
        if !(self.street.is_empty()
            && self.city.is_empty()
            && self.postcode.is_empty()
            && self.country.is_empty())
        {
            card.push_str(&format!(
                "ADR;TYPE=HOME:;;{};{};;{};{}{}",
                escape(&self.street),
                escape(&self.city),
                escape(&self.postcode),
                escape(&self.country),
                CRLF
            ));
        }
        push_line(&mut card, "URL;TYPE=HOME", &self.website);
        if let Some(birthday) = self.birthday {
            push_line(&mut card, "BDAY", &birthday.format("%Y-%m-%d").to_string());
        }
        push_line(&mut card, "EMAIL;TYPE=INTERNET,PREF", &self.email);
        if let Some(gender) = self.gender {
            let code = match gender {
                Gender::Male => "M",
                Gender::Female => "F",
                Gender::Diverse => "O",
            };
            push_line(&mut card, "X-GENDER", code);
        }
        if let Some(updated_at) = self.updated_at {
            push_line(&mut card, "REV", &updated_at.format("%Y%m%dT%H%M%SZ").to_string());
        }
        card.push_str("END:VCARD");
        card.push_str(CRLF);
        card
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::users::{Gender, User};

    fn user() -> User {
        User {
            id: 3,
            login: "jdoe".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.org".into(),
            phone: "+49 30 1234".into(),
            mobile: String::new(),
            fax: String::new(),
            street: "Main Street 1".into(),
            postcode: "10115".into(),
            city: "Berlin".into(),
            country: "Germany".into(),
            website: String::new(),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 17),
            gender: Some(Gender::Female),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 2, 1, 10, 30, 0).unwrap()),
        }
    }

    #[test]
    fn serializes_full_card() {
        let expected = "BEGIN:VCARD\r\n\
            VERSION:3.0\r\n\
            N:Doe;Jane;;;\r\n\
            FN:Jane Doe\r\n\
            NICKNAME:jdoe\r\n\
            TEL;TYPE=HOME,VOICE:+49 30 1234\r\n\
            ADR;TYPE=HOME:;;Main Street 1;Berlin;;10115;Germany\r\n\
            BDAY:1990-05-17\r\n\
            EMAIL;TYPE=INTERNET,PREF:jane@example.org\r\n\
            X-GENDER:F\r\n\
            REV:20240201T103000Z\r\n\
            END:VCARD\r\n";
        assert_eq!(user().vcard(), expected);
    }

    #[test]
    fn escapes_special_characters() {
        let mut u = user();
        u.last_name = "Doe; Jr.".into();
        u.city = "Berlin, Mitte".into();
        let card = u.vcard();
        assert!(card.contains("N:Doe\\; Jr.;Jane;;;\r\n"));
        assert!(card.contains(";Berlin\\, Mitte;"));
    }

    #[test]
    fn omits_empty_address() {
        let mut u = user();
        u.street.clear();
        u.postcode.clear();
        u.city.clear();
        u.country.clear();
        assert!(!u.vcard().contains("ADR"));
    }
}
