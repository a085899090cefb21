use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;

use voca_backend::catalog::Word;
use voca_backend::progress::{ProgressStore, Stage};
use voca_backend::quiz::spelling::is_correct_spelling;
use voca_backend::quiz::{ResultRecord, TestType};
use voca_backend::report::{retry_candidates, score, Report};
use voca_backend::store::MemoryStore;

fn record(id: i64, correct: bool, test_type: TestType) -> ResultRecord {
    ResultRecord::new(
        Word {
            id,
            word: format!("w{id}"),
            meaning: format!("m{id}"),
            example: String::new(),
            example_meaning: String::new(),
        },
        correct,
        "answer",
        test_type,
    )
}

fn records(test_type: TestType) -> impl Strategy<Value = Vec<ResultRecord>> {
    prop::collection::vec((0_i64..8, any::<bool>()), 0..12).prop_map(move |pairs| {
        pairs
            .into_iter()
            .map(|(id, correct)| record(id, correct, test_type))
            .collect()
    })
}

fn stage() -> impl Strategy<Value = Stage> {
    prop_oneof![Just(Stage::Flashcard), Just(Stage::Recall), Just(Stage::Spelling)]
}

proptest! {
    #[test]
    fn pt_score_is_a_bounded_percentage(total in 0_usize..500, seed in any::<usize>()) {
        let correct = if total == 0 { 0 } else { seed % (total + 1) };
        let s = score(correct, total);
        prop_assert!(s <= 100);
        if total == 0 {
            prop_assert_eq!(s, 0);
        }
        if correct == total && total > 0 {
            prop_assert_eq!(s, 100);
        }
    }

    #[test]
    fn pt_report_totals_add_up(recall in records(TestType::Recall), spell in records(TestType::Spell)) {
        let report = Report::from_session(&recall, &spell);
        prop_assert_eq!(report.total, recall.len() + spell.len());
        prop_assert_eq!(report.correct, report.correct_list.len());
        prop_assert!(report.correct <= report.total);
        prop_assert_eq!(report.score, score(report.correct, report.total));
    }

    #[test]
    fn pt_retry_candidates_are_unique_wrong_words(recall in records(TestType::Recall), spell in records(TestType::Spell)) {
        let all: Vec<&ResultRecord> = recall.iter().chain(spell.iter()).collect();
        let candidates = retry_candidates(all.iter().copied());

        let ids: Vec<i64> = candidates.iter().map(|w| w.id).collect();
        let unique: HashSet<i64> = ids.iter().copied().collect();
        prop_assert_eq!(ids.len(), unique.len());

        let wrong: HashSet<i64> = all.iter().filter(|r| !r.is_correct).map(|r| r.word.id).collect();
        prop_assert_eq!(unique, wrong);
    }

    #[test]
    fn pt_stage_flags_only_rise(ops in prop::collection::vec((0_u8..3, stage(), any::<bool>()), 0..30)) {
        let mut progress = ProgressStore::load(Arc::new(MemoryStore::new()));
        let mut expected: HashMap<(String, Stage), bool> = HashMap::new();

        for (unit, stage, value) in &ops {
            let unit_id = format!("u{unit}");
            progress.set_stage(&unit_id, *stage, *value).unwrap();
            let flag = expected.entry((unit_id.clone(), *stage)).or_insert(false);
            *flag |= *value;

            let before = progress.flags(&unit_id);
            progress.set_stage(&unit_id, *stage, *value).unwrap();
            prop_assert_eq!(progress.flags(&unit_id), before);
        }

        for ((unit_id, stage), flag) in expected {
            prop_assert_eq!(progress.flags(&unit_id).get(stage), flag);
        }
    }

    #[test]
    fn pt_spelling_ignores_case_and_padding(word in "[a-z]{1,12}", left in " {0,3}", right in " {0,3}") {
        let typed = format!("{left}{}{right}", word.to_uppercase());
        prop_assert!(is_correct_spelling(&typed, &word));
        let typo = format!("{word}x");
        prop_assert!(!is_correct_spelling(&typo, &word));
    }
}
