use serde::Serialize;

use crate::catalog::Word;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardView {
    pub index: usize,
    pub total: usize,
    pub word: Word,
    pub flipped: bool,
    pub meaning_first: bool,
    pub is_last: bool,
}

/// Ordered walk over a unit's words. Every move shows the front face again.
#[derive(Debug, Clone)]
pub struct FlashcardDeck {
    words: Vec<Word>,
    current: usize,
    flipped: bool,
    meaning_first: bool,
}

impl FlashcardDeck {
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            current: 0,
            flipped: false,
            meaning_first: false,
        }
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.words.len() {
            self.current += 1;
        }
        self.flipped = false;
    }

    pub fn prev(&mut self) {
        self.current = self.current.saturating_sub(1);
        self.flipped = false;
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn toggle_order(&mut self) {
        self.meaning_first = !self.meaning_first;
        self.flipped = false;
    }

    /// An empty deck counts as already on its last card.
    pub fn is_on_last_card(&self) -> bool {
        self.current + 1 >= self.words.len()
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.current)
    }

    pub fn view(&self) -> Option<FlashcardView> {
        self.current_word().map(|word| FlashcardView {
            index: self.current,
            total: self.words.len(),
            word: word.clone(),
            flipped: self.flipped,
            meaning_first: self.meaning_first,
            is_last: self.is_on_last_card(),
        })
    }
}
