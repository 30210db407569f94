use std::collections::BTreeSet;
use std::path::Path;

use kermut_core::DataError;
use kermut_data::zero_shot::merge_scores;
use kermut_data::{align_to_table, mean_pool, MutationTable};
use ndarray::{Array2, Array3, Axis};
use proptest::prelude::*;

/// Distinct identifiers plus a permutation of them, standing in for the
/// table order and the store order.
fn ids_and_permutation() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    prop::collection::btree_set("[A-Y][0-9]{1,3}[A-Y]", 1..40)
        .prop_map(|set: BTreeSet<String>| set.into_iter().collect::<Vec<_>>())
        .prop_flat_map(|ids| {
            let shuffled = Just(ids.clone()).prop_shuffle();
            (Just(ids), shuffled)
        })
}

/// Embedding row that encodes its identifier, so alignment can be checked
/// by content.
fn encode(id: &str) -> [f32; 2] {
    let sum: u32 = id.bytes().map(u32::from).sum();
    [sum as f32, id.len() as f32]
}

proptest! {
    #[test]
    fn aligned_rows_follow_table_order((table_ids, stored_ids) in ids_and_permutation(), extra in 0usize..5) {
        let mut stored = stored_ids.clone();
        for i in 0..extra {
            stored.push(format!("extra{i}"));
        }
        let mut emb = Array2::<f32>::zeros((stored.len(), 2));
        for (row, id) in stored.iter().enumerate() {
            let [a, b] = encode(id);
            emb[[row, 0]] = a;
            emb[[row, 1]] = b;
        }

        let table_refs: Vec<&str> = table_ids.iter().map(String::as_str).collect();
        let aligned = align_to_table(&stored, &emb, &table_refs).unwrap();

        prop_assert_eq!(aligned.nrows(), table_ids.len());
        for (row, id) in table_ids.iter().enumerate() {
            let [a, b] = encode(id);
            prop_assert_eq!(aligned[[row, 0]], a);
            prop_assert_eq!(aligned[[row, 1]], b);
        }
    }

    #[test]
    fn any_unstored_table_row_is_reported((table_ids, stored_ids) in ids_and_permutation(), pick in any::<prop::sample::Index>()) {
        let dropped = pick.get(&stored_ids).clone();
        let stored: Vec<String> = stored_ids.iter().filter(|id| **id != dropped).cloned().collect();
        let emb = Array2::<f32>::zeros((stored.len(), 2));

        let table_refs: Vec<&str> = table_ids.iter().map(String::as_str).collect();
        match align_to_table(&stored, &emb, &table_refs) {
            Err(DataError::MissingEmbeddings { missing }) => prop_assert_eq!(missing, vec![dropped]),
            other => prop_assert!(false, "expected MissingEmbeddings, got {:?}", other.map(|a| a.dim())),
        }
    }

    #[test]
    fn pooling_is_the_mean_over_tokens(n in 1usize..6, l in 1usize..6, d in 1usize..6, seed in 0u32..1000) {
        let per_token = Array3::from_shape_fn((n, l, d), |(i, j, k)| {
            ((i * 31 + j * 17 + k * 7) as u32 ^ seed) as f32 % 13.0
        });
        let pooled = mean_pool(per_token.clone().into_dyn()).unwrap();
        prop_assert_eq!(pooled.dim(), (n, d));
        for i in 0..n {
            for k in 0..d {
                let mean = per_token.index_axis(Axis(0), i).column(k).sum() / l as f32;
                prop_assert!((pooled[[i, k]] - mean).abs() < 1e-4);
            }
        }
        let again = mean_pool(pooled.clone().into_dyn()).unwrap();
        prop_assert_eq!(again, pooled);
    }

    #[test]
    fn complete_scores_merge_without_nan((table_ids, score_ids) in ids_and_permutation()) {
        let mut table_csv = String::from("mutant\n");
        for id in &table_ids {
            table_csv.push_str(&format!("{id}\n"));
        }
        let mut scores_csv = String::from("score,mutant\n");
        for id in &score_ids {
            scores_csv.push_str(&format!("{},{id}\n", encode(id)[0]));
        }
        let table = MutationTable::from_reader(table_csv.as_bytes(), Path::new("t.csv")).unwrap();
        let scores = MutationTable::from_reader(scores_csv.as_bytes(), Path::new("s.csv")).unwrap();

        let merged = merge_scores(&table, &scores, "score").unwrap();
        prop_assert_eq!(merged.len(), table_ids.len());
        for (row, id) in table_ids.iter().enumerate() {
            prop_assert_eq!(merged[row], encode(id)[0]);
        }
    }
}
