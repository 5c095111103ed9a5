//! Card parsing from string tokens (e.g., "AS", "2C", "TH", "sJ", "bJ")

use std::fmt;
use std::str::FromStr;

use super::cards_types::{CardBase, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

fn parse_err(s: &str) -> DomainError {
    DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"))
}

fn rank_char(rank: Rank) -> char {
    match rank {
        Rank::Two => '2',
        Rank::Three => '3',
        Rank::Four => '4',
        Rank::Five => '5',
        Rank::Six => '6',
        Rank::Seven => '7',
        Rank::Eight => '8',
        Rank::Nine => '9',
        Rank::Ten => 'T',
        Rank::Jack => 'J',
        Rank::Queen => 'Q',
        Rank::King => 'K',
        Rank::Ace => 'A',
        Rank::OffSuitNatural => 'o',
        Rank::OnSuitNatural => 'n',
        Rank::SmallJoker => 's',
        Rank::BigJoker => 'b',
    }
}

fn suit_char(suit: Suit) -> char {
    match suit {
        Suit::Clubs => 'C',
        Suit::Diamonds => 'D',
        Suit::Spades => 'S',
        Suit::Hearts => 'H',
        Suit::Trump => 'J',
    }
}

impl fmt::Display for CardBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", rank_char(self.rank), suit_char(self.suit))
    }
}

impl FromStr for CardBase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sJ" => return Ok(CardBase::SMALL_JOKER),
            "bJ" => return Ok(CardBase::BIG_JOKER),
            _ => {}
        }
        let mut chars = s.chars();
        let (Some(rank_ch), Some(suit_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(parse_err(s));
        };
        let rank = match rank_ch {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return Err(parse_err(s)),
        };
        let suit = match suit_ch {
            'C' => Suit::Clubs,
            'D' => Suit::Diamonds,
            'S' => Suit::Spades,
            'H' => Suit::Hearts,
            _ => return Err(parse_err(s)),
        };
        Ok(CardBase { suit, rank })
    }
}

/// Non-panicking helper to parse card tokens into physical cards.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<CardBase>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<CardBase>())
        .collect()
}

/// Parse a whitespace-separated list of tokens ("AS AS KS KS").
pub fn parse_card_list(s: &str) -> Result<Vec<CardBase>, DomainError> {
    try_parse_cards(s.split_whitespace())
}
