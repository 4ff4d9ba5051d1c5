/// The four fixed games tracked by the results site. Immutable, known at
/// compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Game {
    Desawar,
    Faridabad,
    Ghaziabad,
    Gali,
}

impl Game {
    pub const ALL: [Game; 4] = [Game::Desawar, Game::Faridabad, Game::Ghaziabad, Game::Gali];

    /// Short code used in callback data.
    pub fn code(&self) -> &'static str {
        match self {
            Game::Desawar => "DSWR",
            Game::Faridabad => "FRBD",
            Game::Ghaziabad => "GZBD",
            Game::Gali => "GALI",
        }
    }

    /// Display name as it appears in the site's `h3.game-name` headings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Game::Desawar => "DESAWAR",
            Game::Faridabad => "FARIDABAD",
            Game::Ghaziabad => "GHAZIABAD",
            Game::Gali => "GALI",
        }
    }

    pub fn emoji(&self) -> &'static str {
        "🎲"
    }

    pub fn from_code(code: &str) -> Option<Game> {
        Game::ALL.into_iter().find(|g| g.code() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for game in Game::ALL {
            assert_eq!(Game::from_code(game.code()), Some(game));
        }
        assert_eq!(Game::from_code("NOPE"), None);
        assert_eq!(Game::from_code("dswr"), None); // codes are case-sensitive
    }
}
