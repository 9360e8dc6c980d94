//! Verb catalog for face lookup.
//!
//! The `VerbCatalog` maps verb ids to their English and Spanish forms.
//! The number of verbs it holds is the hard ceiling on how many pairs a
//! board can use.

use rustc_hash::FxHashMap;

use crate::core::{Language, VerbId};

const STANDARD_VERBS: [(&str, &str); 30] = [
    ("Run", "Correr"),
    ("Eat", "Comer"),
    ("Study", "Estudiar"),
    ("Work", "Trabajar"),
    ("Learn", "Aprender"),
    ("Speak", "Hablar"),
    ("Read", "Leer"),
    ("Write", "Escribir"),
    ("Play", "Jugar"),
    ("Sleep", "Dormir"),
    ("Walk", "Caminar"),
    ("Drink", "Beber"),
    ("Cook", "Cocinar"),
    ("Dance", "Bailar"),
    ("Sing", "Cantar"),
    ("Swim", "Nadar"),
    ("Travel", "Viajar"),
    ("Buy", "Comprar"),
    ("Sell", "Vender"),
    ("Open", "Abrir"),
    ("Close", "Cerrar"),
    ("Listen", "Escuchar"),
    ("Watch", "Mirar"),
    ("Wash", "Lavar"),
    ("Clean", "Limpiar"),
    ("Drive", "Manejar"),
    ("Fly", "Volar"),
    ("Jump", "Saltar"),
    ("Think", "Pensar"),
    ("Know", "Saber"),
];

/// A verb and its two faces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verb {
    pub id: VerbId,
    pub english: String,
    pub spanish: String,
}

impl Verb {
    #[must_use]
    pub fn new(id: VerbId, english: impl Into<String>, spanish: impl Into<String>) -> Self {
        Self {
            id,
            english: english.into(),
            spanish: spanish.into(),
        }
    }

    /// Text for one language.
    #[must_use]
    pub fn text(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Spanish => &self.spanish,
        }
    }
}

/// Registry of verbs.
///
/// ## Example
///
/// ```
/// use rust_memory::cards::VerbCatalog;
/// use rust_memory::core::VerbId;
///
/// let catalog = VerbCatalog::standard();
/// assert_eq!(catalog.len(), 30);
///
/// let read = catalog.get_verb(VerbId::new(7)).unwrap();
/// assert_eq!(read.english, "Read");
/// assert_eq!(catalog.text(-7), Some("Leer"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct VerbCatalog {
    verbs: FxHashMap<VerbId, Verb>,
}

impl VerbCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The 30 built-in verbs, ids 1 through 30.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for (index, (english, spanish)) in STANDARD_VERBS.iter().enumerate() {
            catalog.register(Verb::new(VerbId::new(index as u32 + 1), *english, *spanish));
        }
        catalog
    }

    /// Register a verb.
    ///
    /// Panics if the id is 0, above `i32::MAX` (card values are signed
    /// ids) or already registered.
    pub fn register(&mut self, verb: Verb) {
        assert!(verb.id.0 > 0, "Verb ids start at 1");
        assert!(
            verb.id.0 <= i32::MAX as u32,
            "Verb id {} does not fit a card value",
            verb.id.0
        );
        if self.verbs.contains_key(&verb.id) {
            panic!("Verb with ID {:?} already registered", verb.id);
        }
        self.verbs.insert(verb.id, verb);
    }

    /// Get a verb by ID.
    #[must_use]
    pub fn get_verb(&self, id: VerbId) -> Option<&Verb> {
        self.verbs.get(&id)
    }

    /// Check if a verb ID is registered.
    #[must_use]
    pub fn contains(&self, id: VerbId) -> bool {
        self.verbs.contains_key(&id)
    }

    /// Check if a signed card value names a registered verb.
    #[must_use]
    pub fn contains_value(&self, value: i32) -> bool {
        value != 0 && self.contains(VerbId(value.unsigned_abs()))
    }

    /// Text shown on a card with this value.
    #[must_use]
    pub fn text(&self, value: i32) -> Option<&str> {
        if value == 0 {
            return None;
        }
        self.get_verb(VerbId(value.unsigned_abs()))
            .map(|verb| verb.text(Language::of_value(value)))
    }

    /// Get the number of registered verbs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// All verb ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<VerbId> {
        let mut ids: Vec<_> = self.verbs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
