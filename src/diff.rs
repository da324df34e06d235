use std::collections::HashSet;

use crate::domain::{Snapshot, Transaction};

/// Returns the transactions of `new` whose hash is not present in `old`.
///
/// Logical duplicates within `new` collapse to one entry per hash (the last
/// occurrence wins, in first-seen order). If any entry on either side lacks
/// the identity field the result is empty: the cycle proceeds with nothing
/// new rather than alerting spuriously.
pub fn new_transactions(new: &Snapshot, old: &Snapshot) -> Vec<Transaction> {
    let mut seen = HashSet::with_capacity(old.len());
    for txn in old {
        match txn.hash() {
            Some(hash) => {
                seen.insert(hash);
            }
            None => return Vec::new(),
        }
    }

    let mut order: Vec<&str> = Vec::new();
    let mut latest: Vec<Option<&Transaction>> = Vec::new();
    for txn in new {
        let Some(hash) = txn.hash() else {
            return Vec::new();
        };
        if seen.contains(hash) {
            continue;
        }
        match order.iter().position(|h| *h == hash) {
            Some(i) => latest[i] = Some(txn),
            None => {
                order.push(hash);
                latest.push(Some(txn));
            }
        }
    }

    latest.into_iter().flatten().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::new_transactions;
    use crate::domain::Transaction;

    fn txn(hash: &str) -> Transaction {
        Transaction::from_pairs(&[("hash", hash)])
    }

    #[test]
    fn finds_transactions_absent_from_old_snapshot() {
        let old = vec![txn("0xa")];
        let new = vec![txn("0xa"), txn("0xb")];
        assert_eq!(new_transactions(&new, &old), vec![txn("0xb")]);
    }

    #[test]
    fn empty_when_nothing_changed() {
        let old = vec![txn("0xa"), txn("0xb")];
        let new = vec![txn("0xb"), txn("0xa")];
        assert!(new_transactions(&new, &old).is_empty());
    }

    #[test]
    fn everything_is_new_against_empty_old() {
        let new = vec![txn("0xa"), txn("0xb")];
        assert_eq!(new_transactions(&new, &Vec::new()).len(), 2);
    }

    #[test]
    fn collapses_duplicates_last_seen_wins() {
        let first = Transaction::from_pairs(&[("hash", "0xa"), ("value", "1")]);
        let second = Transaction::from_pairs(&[("hash", "0xa"), ("value", "2")]);
        let new = vec![first, second.clone(), txn("0xb")];

        let diff = new_transactions(&new, &Vec::new());
        assert_eq!(diff, vec![second, txn("0xb")]);
    }

    #[test]
    fn missing_identity_in_new_fails_safe() {
        let new = vec![txn("0xa"), Transaction::from_pairs(&[("value", "1")])];
        assert!(new_transactions(&new, &Vec::new()).is_empty());
    }

    #[test]
    fn missing_identity_in_old_fails_safe() {
        let old = vec![Transaction::from_pairs(&[("value", "1")])];
        let new = vec![txn("0xa")];
        assert!(new_transactions(&new, &old).is_empty());
    }
}
