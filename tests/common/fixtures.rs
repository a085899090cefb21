pub const TEST_PASSPHRASE: &str = "integration-passphrase";

/// One textbook with a three-word unit, a single-word unit and an empty unit.
pub const FIXTURE_CATALOG: &str = r#"{
  "textbooks": [
    {
      "id": "book",
      "title": "Fixture Book",
      "units": [
        {
          "id": "fruit",
          "title": "Unit 1",
          "words": [
            { "id": 5, "word": "apple", "meaning": "사과", "example": "I ate an apple.", "exampleMeaning": "나는 사과를 먹었다." },
            { "id": 6, "word": "cherry", "meaning": "체리" },
            { "id": 7, "word": "banana", "meaning": "바나나" }
          ]
        },
        {
          "id": "solo",
          "title": "Unit 2",
          "words": [ { "id": 9, "word": "solo", "meaning": "혼자" } ]
        },
        { "id": "empty", "title": "Unit 3", "words": [] }
      ]
    }
  ]
}"#;

const PAIRS: [(&str, &str); 4] = [
    ("apple", "사과"),
    ("cherry", "체리"),
    ("banana", "바나나"),
    ("solo", "혼자"),
];

pub fn meaning_of(word: &str) -> &'static str {
    PAIRS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, m)| *m)
        .unwrap_or_else(|| panic!("word not in fixture: {word}"))
}

pub fn word_for(meaning: &str) -> &'static str {
    PAIRS
        .iter()
        .find(|(_, m)| *m == meaning)
        .map(|(w, _)| *w)
        .unwrap_or_else(|| panic!("meaning not in fixture: {meaning}"))
}
