//! Dealing a board.

use im::Vector;

use crate::core::{Card, CardId, Difficulty, GameError, GameRng, Result};

use super::catalog::VerbCatalog;

/// Builds shuffled, paired boards from a catalog.
///
/// ```
/// use rust_memory::cards::{DeckBuilder, VerbCatalog};
/// use rust_memory::core::{Difficulty, GameRng};
///
/// let catalog = VerbCatalog::standard();
/// let mut rng = GameRng::new(42);
///
/// let cards = DeckBuilder::new(&catalog).build(Difficulty::Easy, &mut rng).unwrap();
/// assert_eq!(cards.len(), 12);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DeckBuilder<'a> {
    catalog: &'a VerbCatalog,
}

impl<'a> DeckBuilder<'a> {
    #[must_use]
    pub fn new(catalog: &'a VerbCatalog) -> Self {
        Self { catalog }
    }

    /// Deal a board for `difficulty`.
    pub fn build(&self, difficulty: Difficulty, rng: &mut GameRng) -> Result<Vector<Card>> {
        self.build_pairs(difficulty.pairs(), rng)
    }

    /// Deal `pairs` pairs of distinct verbs.
    ///
    /// Fails with `InsufficientVerbs` before touching the RNG when the
    /// catalog is too small.
    pub fn build_pairs(&self, pairs: usize, rng: &mut GameRng) -> Result<Vector<Card>> {
        let available = self.catalog.ids();
        let chosen = rng.sample(&available, pairs).ok_or(GameError::InsufficientVerbs {
            requested: pairs,
            available: available.len(),
        })?;

        let mut cards = Vec::with_capacity(pairs * 2);
        for verb in chosen {
            cards.push(Card::new(CardId::new(cards.len() as u32), verb.english_value()));
            cards.push(Card::new(CardId::new(cards.len() as u32), verb.spanish_value()));
        }

        rng.shuffle(&mut cards);
        log::debug!("dealt {} cards from {} verbs", cards.len(), available.len());

        Ok(cards.into_iter().collect())
    }
}
