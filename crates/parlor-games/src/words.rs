//! The built-in secret-word list for the letter-guessing game.
//!
//! Words are uppercase ASCII letters only; each carries a hint and a
//! category shown to the guessers. Deployments can supply their own list
//! through [`GameConfig`](crate::GameConfig) at startup.

/// A secret word with its hint and category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub hint: String,
    pub category: String,
}

impl WordEntry {
    /// Builds an entry, uppercasing the word.
    pub fn new(word: &str, hint: &str, category: &str) -> Self {
        Self {
            word: word.to_ascii_uppercase(),
            hint: hint.to_string(),
            category: category.to_string(),
        }
    }
}

/// (word, hint, category) source for the default list.
const BUILTIN: &[(&str, &str, &str)] = &[
    ("ELEPHANT", "the largest land animal", "Animals"),
    ("PENGUIN", "a bird that swims but cannot fly", "Animals"),
    ("GIRAFFE", "known for its very long neck", "Animals"),
    ("DOLPHIN", "an intelligent marine mammal", "Animals"),
    ("OCTOPUS", "has eight arms and three hearts", "Animals"),
    ("GUITAR", "a six-stringed instrument", "Music"),
    ("TRUMPET", "a brass instrument with three valves", "Music"),
    ("VIOLIN", "played with a bow", "Music"),
    ("VOLCANO", "a mountain that can erupt", "Nature"),
    ("GLACIER", "a slow-moving river of ice", "Nature"),
    ("RAINBOW", "appears after rain, has seven colors", "Nature"),
    ("THUNDER", "the sound that follows lightning", "Nature"),
    ("PYRAMID", "ancient Egyptian monument", "Places"),
    ("LIGHTHOUSE", "guides ships away from the shore", "Places"),
    ("LIBRARY", "a building full of books", "Places"),
    ("BICYCLE", "a two-wheeled vehicle you pedal", "Things"),
    ("TELESCOPE", "used to look at distant stars", "Things"),
    ("UMBRELLA", "keeps you dry in the rain", "Things"),
    ("SANDWICH", "food between two slices of bread", "Food"),
    ("PANCAKE", "a flat breakfast cake", "Food"),
    ("AVOCADO", "a green fruit used in guacamole", "Food"),
    ("ASTRONAUT", "travels to outer space", "Jobs"),
    ("DETECTIVE", "solves mysteries for a living", "Jobs"),
    ("CARPENTER", "works with wood", "Jobs"),
];

/// Returns the default word list.
pub fn builtin_words() -> Vec<WordEntry> {
    BUILTIN
        .iter()
        .map(|(w, h, c)| WordEntry::new(w, h, c))
        .collect()
}

/// Static per-engine configuration, supplied at server startup.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Story game: the story completes at this many lines.
    pub max_story_lines: usize,
    /// Letters game: the game is lost at this many wrong guesses.
    pub max_wrong_guesses: usize,
    /// Letters game: the pool of secret words.
    pub words: Vec<WordEntry>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_story_lines: 20,
            max_wrong_guesses: 6,
            words: builtin_words(),
        }
    }
}
