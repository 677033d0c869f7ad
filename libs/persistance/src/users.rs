use std::{collections::HashMap, fs, io, path::PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadUsersError {
    #[error("could not read user file at {0:?}")]
    Read(PathBuf, #[source] io::Error),
    #[error("could not parse user file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("user id {0} is used more than once")]
    DuplicateId(u32),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub fax: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Diverse,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Deserialize)]
struct UserFile {
    #[serde(default)]
    users: Vec<User>,
}

pub const DEFAULT_USERS: &str = r#"[[users]]
id = 1
login = "admin"
first_name = "Paul"
last_name = "Webmaster"
email = "webmaster@example.org"
city = "Example City"
country = "Germany"
"#;

/// All user records, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: HashMap<u32, User>,
}

impl UserStore {
    pub fn parse(raw: &str) -> Result<Self, ReadUsersError> {
        let file: UserFile = toml::from_str(raw)?;
        let mut users = HashMap::with_capacity(file.users.len());
        for user in file.users {
            let id = user.id;
            if users.insert(id, user).is_some() {
                return Err(ReadUsersError::DuplicateId(id));
            }
        }
        Ok(Self { users })
    }

    pub fn load(location: PathBuf) -> Result<Self, ReadUsersError> {
        let raw = fs::read_to_string(&location)
            .map_err(|e| ReadUsersError::Read(location.clone(), e))?;
        let store = Self::parse(&raw)?;
        if store.is_empty() {
            warn!("no users found in {:?}", location);
        } else {
            info!("loaded {} users from {:?}", store.len(), location);
        }
        Ok(store)
    }

    pub fn get(&self, id: u32) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_file() {
        let store = UserStore::parse(
            r#"
            [[users]]
            id = 7
            login = "jdoe"
            first_name = "Jane"
            last_name = "Doe"
            birthday = "1990-05-17"
            gender = "female"
            updated_at = "2024-02-01T10:30:00Z"
            "#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        let user = store.get(7).unwrap();
        assert_eq!(user.full_name(), "Jane Doe");
        assert_eq!(user.birthday, NaiveDate::from_ymd_opt(1990, 5, 17));
        assert_eq!(user.gender, Some(Gender::Female));
        assert!(user.email.is_empty());
        assert!(store.get(8).is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let raw = r#"
            [[users]]
            id = 1
            login = "a"
            first_name = "A"
            last_name = "A"

            [[users]]
            id = 1
            login = "b"
            first_name = "B"
            last_name = "B"
            "#;
        assert!(matches!(
            UserStore::parse(raw),
            Err(ReadUsersError::DuplicateId(1))
        ));
    }

    #[test]
    fn loads_empty_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("users.toml");
        fs::write(&location, "").unwrap();
        let store = UserStore::load(location).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn default_users_parse() {
        let store = UserStore::parse(DEFAULT_USERS).unwrap();
        assert_eq!(store.get(1).unwrap().login, "admin");
    }
}
