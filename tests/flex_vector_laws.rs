//! Property-based tests for FlexVector laws.
//!
//! Narrow 4-way nodes are used throughout so that small inputs already build
//! multi-level, relaxed trees.

use flexvec::config::Config;
use flexvec::persistent::FlexVector;
use flexvec::policy::RcPolicy;
use proptest::prelude::*;

type Tiny = Config<RcPolicy, 2, 2>;
type Vector = FlexVector<i32, Tiny>;

fn to_vec(vector: &Vector) -> Vec<i32> {
    vector.iter().copied().collect()
}

/// Builds a vector from `parts` by concatenation, so the tree carries seams.
fn concatenated(parts: &[Vec<i32>]) -> Vector {
    parts
        .iter()
        .map(|part| part.iter().copied().collect::<Vector>())
        .fold(Vector::new(), |vector, piece| vector.append(&piece))
}

fn parts_strategy() -> impl Strategy<Value = Vec<Vec<i32>>> {
    prop::collection::vec(prop::collection::vec(any::<i32>(), 0..40), 0..8)
}

/// One edit applied to both a transient and a persistent vector.
#[derive(Clone, Debug)]
enum Edit {
    PushBack(i32),
    PushFront(i32),
    Set(usize, i32),
    PopBack,
    Take(usize),
    DropFirst(usize),
    Append(Vec<i32>),
    Snapshot,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => any::<i32>().prop_map(Edit::PushBack),
        2 => any::<i32>().prop_map(Edit::PushFront),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(seed, value)| Edit::Set(seed, value)),
        2 => Just(Edit::PopBack),
        1 => any::<usize>().prop_map(Edit::Take),
        1 => any::<usize>().prop_map(Edit::DropFirst),
        2 => prop::collection::vec(any::<i32>(), 0..30).prop_map(Edit::Append),
        1 => Just(Edit::Snapshot),
    ]
}

// =============================================================================
// Lookup and Update Laws
// =============================================================================

proptest! {
    /// Get-Update Law: an updated element reads back
    #[test]
    fn prop_get_update_law(
        parts in parts_strategy(),
        seed in any::<usize>(),
        value in any::<i32>()
    ) {
        let vector = concatenated(&parts);
        prop_assume!(!vector.is_empty());
        let index = seed % vector.len();

        let updated = vector.update(index, value).unwrap();
        prop_assert_eq!(updated.get(index), Some(&value));
        prop_assert!(updated.tree().validate().is_ok());
    }

    /// Get-Update-Other Law: update does not affect any other index
    #[test]
    fn prop_get_update_other_law(
        parts in parts_strategy(),
        seed in any::<usize>()
    ) {
        let vector = concatenated(&parts);
        prop_assume!(!vector.is_empty());
        let index = seed % vector.len();

        let updated = vector.update(index, 99999).unwrap();
        for other in (0..vector.len()).filter(|&other| other != index) {
            prop_assert_eq!(updated.get(other), vector.get(other));
        }
    }

    /// Push-Back Law: push_back grows by one and appends the value
    #[test]
    fn prop_push_back_law(parts in parts_strategy(), value in any::<i32>()) {
        let vector = concatenated(&parts);
        let pushed = vector.push_back(value);
        prop_assert_eq!(pushed.len(), vector.len() + 1);
        prop_assert_eq!(pushed.last(), Some(&value));
        prop_assert_eq!(pushed.take(vector.len()), vector);
        prop_assert!(pushed.tree().validate().is_ok());
    }
}

// =============================================================================
// Concatenation Laws
// =============================================================================

proptest! {
    /// Concatenation matches Vec concatenation
    #[test]
    fn prop_append_matches_model(parts in parts_strategy()) {
        let vector = concatenated(&parts);
        prop_assert_eq!(to_vec(&vector), parts.concat());
        prop_assert!(vector.tree().validate().is_ok());
    }

    /// Associativity Law: (a ++ b) ++ c == a ++ (b ++ c)
    #[test]
    fn prop_append_associativity(
        first in parts_strategy(),
        second in parts_strategy(),
        third in parts_strategy()
    ) {
        let (first, second, third) = (concatenated(&first), concatenated(&second), concatenated(&third));
        let left = first.append(&second).append(&third);
        let right = first.append(&second.append(&third));
        prop_assert_eq!(&left, &right);
        prop_assert!(left.tree().validate().is_ok());
        prop_assert!(right.tree().validate().is_ok());
    }

    /// Identity Law: appending an empty vector returns the same tree
    #[test]
    fn prop_append_identity(parts in parts_strategy()) {
        let vector = concatenated(&parts);
        let empty = Vector::new();
        prop_assert!(vector.append(&empty).tree().ptr_eq(vector.tree()));
        prop_assert!(empty.append(&vector).tree().ptr_eq(vector.tree()));
    }
}

// =============================================================================
// Slicing Laws
// =============================================================================

proptest! {
    /// Split-Join Law: take(k) ++ drop(k) == original
    #[test]
    fn prop_split_join_law(parts in parts_strategy(), seed in any::<usize>()) {
        let vector = concatenated(&parts);
        let index = seed % (vector.len() + 1);
        let rejoined = vector.take(index).append(&vector.drop_first(index));
        prop_assert_eq!(&rejoined, &vector);
        prop_assert!(rejoined.tree().validate().is_ok());
    }

    /// Slices match the model and keep every invariant
    #[test]
    fn prop_slice_matches_model(
        parts in parts_strategy(),
        start in any::<usize>(),
        end in any::<usize>()
    ) {
        let model = parts.concat();
        let vector = concatenated(&parts);
        let start = start % (model.len() + 1);
        let end = end % (model.len() + 1);

        let sliced = vector.slice(start, end);
        let expected: Vec<i32> = if start < end { model[start..end].to_vec() } else { Vec::new() };
        prop_assert_eq!(to_vec(&sliced), expected);
        prop_assert!(sliced.tree().validate().is_ok());
    }

    /// Take Law: take(0) is empty and take(len) is the same tree
    #[test]
    fn prop_take_bounds(parts in parts_strategy()) {
        let vector = concatenated(&parts);
        prop_assert!(vector.take(0).is_empty());
        prop_assert!(vector.take(vector.len()).tree().ptr_eq(vector.tree()));
    }

    /// Insert-Remove Law: removing what was inserted gives back the original
    #[test]
    fn prop_insert_remove_law(
        parts in parts_strategy(),
        seed in any::<usize>(),
        value in any::<i32>()
    ) {
        let vector = concatenated(&parts);
        let index = seed % (vector.len() + 1);
        let inserted = vector.insert(index, value).unwrap();
        prop_assert!(inserted.tree().validate().is_ok());
        let (removed, element) = inserted.remove(index).unwrap();
        prop_assert_eq!(element, value);
        prop_assert_eq!(removed, vector);
    }
}

// =============================================================================
// Iteration Laws
// =============================================================================

proptest! {
    /// Reverse iteration mirrors forward iteration
    #[test]
    fn prop_rev_iteration(parts in parts_strategy()) {
        let vector = concatenated(&parts);
        let mut forward = to_vec(&vector);
        forward.reverse();
        let backward: Vec<i32> = vector.iter().rev().copied().collect();
        prop_assert_eq!(backward, forward);
    }

    /// Transient edits match the same persistent edits
    #[test]
    fn prop_transient_matches_persistent(
        parts in parts_strategy(),
        pushes in prop::collection::vec(any::<i32>(), 0..60),
        seed in any::<usize>()
    ) {
        let vector = concatenated(&parts);

        let mut transient = vector.transient();
        let mut persistent = vector.clone();
        for &value in &pushes {
            transient.push_back(value);
            persistent = persistent.push_back(value);
        }
        if !persistent.is_empty() {
            let index = seed % persistent.len();
            transient.set(index, 0);
            persistent = persistent.update(index, 0).unwrap();
        }
        transient.push_front(-1);
        persistent = persistent.push_front(-1);

        let built = transient.persistent();
        prop_assert_eq!(&built, &persistent);
        prop_assert!(built.tree().validate().is_ok());
        prop_assert_eq!(to_vec(&vector), parts.concat());
    }

    /// Any interleaving of transient edits matches the persistent replay and
    /// a `Vec` model, and leaves the source and every snapshot untouched
    #[test]
    fn prop_transient_edit_sequence_matches_persistent(
        parts in parts_strategy(),
        edits in prop::collection::vec(edit_strategy(), 0..80)
    ) {
        let vector = concatenated(&parts);
        let mut transient = vector.transient();
        let mut persistent = vector.clone();
        let mut model = parts.concat();
        let mut snapshots: Vec<(Vector, Vec<i32>)> = Vec::new();

        for edit in edits {
            match edit {
                Edit::PushBack(value) => {
                    transient.push_back(value);
                    persistent = persistent.push_back(value);
                    model.push(value);
                }
                Edit::PushFront(value) => {
                    transient.push_front(value);
                    persistent = persistent.push_front(value);
                    model.insert(0, value);
                }
                Edit::Set(seed, value) => {
                    if model.is_empty() {
                        prop_assert!(!transient.set(seed, value));
                    } else {
                        let index = seed % model.len();
                        prop_assert!(transient.set(index, value));
                        persistent = persistent.update(index, value).unwrap();
                        model[index] = value;
                    }
                }
                Edit::PopBack => {
                    prop_assert_eq!(transient.pop_back(), model.pop());
                    if let Some((rest, _)) = persistent.pop_back() {
                        persistent = rest;
                    }
                }
                Edit::Take(seed) => {
                    let count = seed % (model.len() + 1);
                    transient.take(count);
                    persistent = persistent.take(count);
                    model.truncate(count);
                }
                Edit::DropFirst(seed) => {
                    let count = seed % (model.len() + 1);
                    transient.drop_first(count);
                    persistent = persistent.drop_first(count);
                    model.drain(..count);
                }
                Edit::Append(values) => {
                    let other: Vector = values.iter().copied().collect();
                    transient.append(&other);
                    persistent = persistent.append(&other);
                    model.extend(values);
                }
                Edit::Snapshot => {
                    let snapshot = transient.snapshot();
                    prop_assert_eq!(&snapshot, &persistent);
                    snapshots.push((snapshot, model.clone()));
                }
            }
            prop_assert_eq!(transient.len(), model.len());
        }

        let built = transient.persistent();
        prop_assert!(built.tree().validate().is_ok());
        prop_assert_eq!(&built, &persistent);
        prop_assert_eq!(to_vec(&built), model);
        prop_assert_eq!(to_vec(&vector), parts.concat());
        for (snapshot, expected) in &snapshots {
            prop_assert!(snapshot.tree().validate().is_ok());
            prop_assert_eq!(&to_vec(snapshot), expected);
        }
    }
}
