//! Players and the seating order.

/// Identifier for a player, 1-based (`1..=MAX_PLAYERS`).
pub type PlayerId = u8;

/// Maximum number of players in a game.
pub const MAX_PLAYERS: usize = 8;

/// Default colours, one per seat.
const PALETTE: [&str; MAX_PLAYERS] = [
    "#D35400", "#27AE60", "#2980B9", "#8E44AD", "#F1C40F", "#C0392B", "#16A085", "#7F8C8D",
];

/// A seated player. Name and colour are display attributes only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Display colour as `#RRGGBB`.
    pub color: String,
}

impl Player {
    /// Create a new player.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Ordered list of players. Seat `i` holds player id `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Seat `count` players named "Player 1", "Player 2", ...
    ///
    /// Returns `None` unless `1 <= count <= MAX_PLAYERS`.
    #[must_use]
    pub fn with_players(count: usize) -> Option<Self> {
        if count == 0 || count > MAX_PLAYERS {
            return None;
        }
        let players = (1..=count)
            .zip(PALETTE)
            .map(|(seat, color)| {
                #[allow(clippy::cast_possible_truncation)]
                let id = seat as PlayerId;
                Player::new(id, format!("Player {seat}"), color)
            })
            .collect();
        Some(Self { players })
    }

    /// Seat players by name, in order, with the default colours.
    ///
    /// Returns `None` unless `1 <= names.len() <= MAX_PLAYERS`.
    #[must_use]
    pub fn from_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Option<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut roster = Self::with_players(names.len())?;
        for (player, name) in roster.players.iter_mut().zip(names) {
            player.name = name;
        }
        Some(roster)
    }

    /// Number of seated players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Always false: a roster has at least one player.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Get a player by id.
    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(id).checked_sub(1)?)
    }

    /// Iterate over players in seating order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_seats_in_order() {
        let roster = Roster::with_players(3).unwrap();
        assert_eq!(roster.len(), 3);
        let ids: Vec<_> = roster.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(roster.get(2).unwrap().name, "Player 2");
        assert_eq!(roster.get(1).unwrap().color, "#D35400");
    }

    #[test]
    fn test_roster_bounds() {
        assert!(Roster::with_players(0).is_none());
        assert!(Roster::with_players(MAX_PLAYERS).is_some());
        assert!(Roster::with_players(MAX_PLAYERS + 1).is_none());
    }

    #[test]
    fn test_roster_from_names() {
        let roster = Roster::from_names(["Bob", "Rob"]).unwrap();
        assert_eq!(roster.get(1).unwrap().name, "Bob");
        assert_eq!(roster.get(2).unwrap().name, "Rob");
        assert_eq!(roster.get(2).unwrap().color, "#27AE60");
        assert!(roster.get(0).is_none());
        assert!(roster.get(3).is_none());
    }
}
