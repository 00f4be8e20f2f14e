//! Entity records stored by [`crate::store::RecordStore`]

/// A type persisted as one row per instance
///
/// Fields are positional: `to_fields` and `from_fields` must agree with
/// `FIELDS`, and the id is always the first field.
pub trait Record: Sized + Send + Sync + 'static {
    /// Entity name used in logs
    const ENTITY: &'static str;

    /// Field names in row order
    const FIELDS: &'static [&'static str];

    fn id(&self) -> i32;

    fn to_fields(&self) -> Vec<String>;

    /// Decode a row that is known to have `FIELDS.len()` fields
    fn from_fields(fields: &[&str]) -> Result<Self, String>;
}

fn parse_int(fields: &[&str], index: usize, name: &str) -> Result<i32, String> {
    fields[index]
        .parse()
        .map_err(|_| format!("{} is not an integer: {:?}", name, fields[index]))
}

/// A team row: `id;name;imageFilename`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: i32,
    pub name: String,
    pub image: String,
}

impl Team {
    /// Image recorded when a team is created without an upload
    pub const DEFAULT_IMAGE: &'static str = "padrao.png";

    pub fn new(id: i32, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image: image.into(),
        }
    }
}

impl Record for Team {
    const ENTITY: &'static str = "team";
    const FIELDS: &'static [&'static str] = &["id", "name", "image"];

    fn id(&self) -> i32 {
        self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.image.clone()]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        Ok(Self {
            id: parse_int(fields, 0, "id")?,
            name: fields[1].to_string(),
            image: fields[2].to_string(),
        })
    }
}

/// A player row: `id;name;email;password;teamId`
///
/// `team_id` is not checked against the team file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub team_id: i32,
}

impl Player {
    /// Plaintext credential check used by the login gate
    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

impl Record for Player {
    const ENTITY: &'static str = "player";
    const FIELDS: &'static [&'static str] = &["id", "name", "email", "password", "team_id"];

    fn id(&self) -> i32 {
        self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.password.clone(),
            self.team_id.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        Ok(Self {
            id: parse_int(fields, 0, "id")?,
            name: fields[1].to_string(),
            email: fields[2].to_string(),
            password: fields[3].to_string(),
            team_id: parse_int(fields, 4, "team_id")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_fields_in_row_order() {
        let team = Team::new(1, "FLA", "fla.png");
        assert_eq!(team.to_fields(), vec!["1", "FLA", "fla.png"]);
        assert_eq!(Team::from_fields(&["1", "FLA", "fla.png"]).unwrap(), team);
    }

    #[test]
    fn test_team_rejects_non_numeric_id() {
        let err = Team::from_fields(&["one", "FLA", "fla.png"]).unwrap_err();
        assert!(err.contains("id is not an integer"));
    }

    #[test]
    fn test_player_decodes_team_id() {
        let player =
            Player::from_fields(&["7", "Gabi", "gabi@fla.com", "senha", "1"]).unwrap();
        assert_eq!(player.team_id, 1);
        assert_eq!(player.email, "gabi@fla.com");
    }

    #[test]
    fn test_player_rejects_non_numeric_team_id() {
        let err = Player::from_fields(&["7", "Gabi", "gabi@fla.com", "senha", "FLA"]).unwrap_err();
        assert!(err.contains("team_id"));
    }

    #[test]
    fn test_matches_credentials_is_exact() {
        let player = Player::from_fields(&["7", "Gabi", "gabi@fla.com", "senha", "1"]).unwrap();
        assert!(player.matches_credentials("gabi@fla.com", "senha"));
        assert!(!player.matches_credentials("GABI@fla.com", "senha"));
        assert!(!player.matches_credentials("gabi@fla.com", "senha "));
    }
}
