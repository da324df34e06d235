use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, info};

use crate::alert::AlertDispatcher;
use crate::diff;
use crate::domain::{Mode, Snapshot, Target, Transaction};
use crate::error::ScreenerError;
use crate::explorer::ExplorerClient;
use crate::filter::FieldFilter;

/// The polling loop: one fetch wave across all targets per cycle, then
/// diff / filter / dispatch per target in configuration order.
///
/// Each target owns its snapshot; a fetch failure or empty page for one
/// target never disturbs the others. The loop has no terminal state of its
/// own: it runs until the process is stopped, or a schema break escalates.
pub struct Screener {
    mode: Mode,
    targets: Vec<Target>,
    snapshots: Vec<Snapshot>,
    fetcher: ExplorerClient,
    field_filter: Option<FieldFilter>,
    dispatcher: AlertDispatcher,
    interval: Duration,
    txn_count: usize,
}

impl Screener {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mode: Mode,
        targets: Vec<Target>,
        fetcher: ExplorerClient,
        field_filter: Option<FieldFilter>,
        dispatcher: AlertDispatcher,
        interval: Duration,
        txn_count: usize,
    ) -> Self {
        let snapshots = vec![Vec::new(); targets.len()];
        Self {
            mode,
            targets,
            snapshots,
            fetcher,
            field_filter,
            dispatcher,
            interval,
            txn_count,
        }
    }

    pub async fn run(&mut self) -> Result<(), ScreenerError> {
        // Seeding: the first fetch establishes each baseline silently, so the
        // initial page contents never produce alerts.
        self.snapshots = self.fetch_wave().await;
        info!(
            "👁️  Baselines established for {} targets, polling every {}s",
            self.targets.len(),
            self.interval.as_secs()
        );

        let mut loop_counter: u64 = 1;
        loop {
            let started = Instant::now();
            tokio::time::sleep(self.interval).await;

            let wave = self.fetch_wave().await;
            for (index, fetched) in wave.into_iter().enumerate() {
                self.process_target(index, fetched).await?;
            }

            info!(
                "Loop {loop_counter} executed in {:.2} secs",
                started.elapsed().as_secs_f64()
            );
            loop_counter += 1;
        }
    }

    /// One fetch per target, concurrently; results come back in target order
    /// regardless of completion order.
    async fn fetch_wave(&self) -> Vec<Snapshot> {
        join_all(self.targets.iter().map(|target| async move {
            match self.mode {
                Mode::Transactions => self.fetcher.last_transactions(target, self.txn_count).await,
                Mode::TokenTransfers => {
                    self.fetcher
                        .last_token_transfers(target, self.txn_count)
                        .await
                }
            }
        }))
        .await
    }

    /// Fetch-time failures were already resolved to empty pages, and delivery
    /// failures are warned inside the dispatcher; the only error that leaves
    /// this method is a schema break, which must stop the run.
    async fn process_target(
        &mut self,
        index: usize,
        fetched: Snapshot,
    ) -> Result<(), ScreenerError> {
        let target = &self.targets[index];

        if fetched.is_empty() {
            debug!("{}: empty fetch, keeping previous snapshot", target.name);
            return Ok(());
        }

        let found = reconcile(&mut self.snapshots[index], fetched);
        if found.is_empty() {
            return Ok(());
        }

        let candidates = self.apply_field_filter(found)?;
        if candidates.is_empty() {
            return Ok(());
        }

        let target = &self.targets[index];
        match self.mode {
            Mode::Transactions => {
                self.dispatcher
                    .dispatch_transactions(target, &candidates)
                    .await
            }
            Mode::TokenTransfers => {
                self.dispatcher
                    .dispatch_token_transfers(target, &candidates)
                    .await
            }
        }
    }

    fn apply_field_filter(
        &self,
        txns: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, ScreenerError> {
        let Some(filter) = &self.field_filter else {
            return Ok(txns);
        };

        let mut kept = Vec::with_capacity(txns.len());
        for txn in txns {
            if filter.matches(&txn)? {
                kept.push(txn);
            }
        }
        Ok(kept)
    }
}

/// Applies one non-empty fetch result to a target's snapshot. Returns the
/// genuinely new transactions; the snapshot is replaced only when there is at
/// least one, so an empty diff keeps the previous comparison baseline even
/// when the fetch returned a transient subset.
fn reconcile(snapshot: &mut Snapshot, fetched: Snapshot) -> Vec<Transaction> {
    let found = diff::new_transactions(&fetched, snapshot);
    if !found.is_empty() {
        *snapshot = fetched;
    }
    found
}

#[cfg(test)]
impl Screener {
    fn seed_with(&mut self, snapshots: Vec<Snapshot>) {
        self.snapshots = snapshots;
    }

    fn snapshot(&self, index: usize) -> &Snapshot {
        &self.snapshots[index]
    }
}

#[cfg(test)]
mod tests {
    use super::{reconcile, Screener};
    use crate::alert::AlertDispatcher;
    use crate::audit::AuditLog;
    use crate::domain::{Mode, Target, Transaction};
    use crate::explorer::ExplorerClient;
    use crate::filter::FieldFilter;
    use crate::network::Network;
    use crate::notifier::{ConsoleNotifier, NotifierHub};
    use std::time::Duration;

    fn txn(hash: &str) -> Transaction {
        Transaction::from_pairs(&[("hash", hash)])
    }

    /// Raw txlist entry carrying every schema-guaranteed field.
    fn full_txn(hash: &str, to: &str) -> Transaction {
        Transaction::from_pairs(&[
            ("hash", hash),
            ("value", "100"),
            ("from", "0x1111111111111111111111111111111111111111"),
            ("to", to),
            ("timeStamp", "1700000000"),
        ])
    }

    fn target(name: &str) -> Target {
        Target {
            name: name.to_string(),
            network: Network::Ethereum,
            contract_address: "0x3666f603cc164936c1b87e207f36beba4ac5f18a".to_string(),
            token_address: None,
            min_amount: 10.0,
            symbol: "USDC".to_string(),
        }
    }

    fn audit_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("screener-test-{}-{name}.log", std::process::id()))
    }

    fn screener(
        mode: Mode,
        targets: Vec<Target>,
        filter: Option<FieldFilter>,
        audit: &std::path::Path,
    ) -> Screener {
        let notifier = NotifierHub::new(ConsoleNotifier::new(), None);
        let dispatcher = AlertDispatcher::new(notifier, AuditLog::open(audit).unwrap());
        Screener::new(
            mode,
            targets,
            ExplorerClient::new(Duration::from_secs(3)),
            filter,
            dispatcher,
            Duration::from_secs(30),
            100,
        )
    }

    #[test]
    fn reconcile_returns_only_new_transactions() {
        let mut snapshot = vec![txn("0xa")];
        let found = reconcile(&mut snapshot, vec![txn("0xa"), txn("0xb")]);
        assert_eq!(found, vec![txn("0xb")]);
    }

    #[test]
    fn reconcile_replaces_snapshot_when_diff_non_empty() {
        let mut snapshot = vec![txn("0xa")];
        reconcile(&mut snapshot, vec![txn("0xb"), txn("0xa")]);
        assert_eq!(snapshot, vec![txn("0xb"), txn("0xa")]);
    }

    #[test]
    fn reconcile_keeps_snapshot_on_empty_diff() {
        let original = vec![txn("0xa"), txn("0xb")];
        let mut snapshot = original.clone();

        // A transient subset response must not shrink the baseline.
        let found = reconcile(&mut snapshot, vec![txn("0xb")]);

        assert!(found.is_empty());
        assert_eq!(snapshot, original);
    }

    #[tokio::test]
    async fn empty_fetch_skips_target_entirely() {
        let path = audit_path("empty-fetch");
        let mut screener = screener(Mode::Transactions, vec![target("t1")], None, &path);
        screener.seed_with(vec![vec![txn("0xa")]]);

        screener.process_target(0, Vec::new()).await.unwrap();

        assert_eq!(screener.snapshot(0), &vec![txn("0xa")]);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn faulted_target_leaves_others_untouched() {
        let path = audit_path("fault-isolation");
        let targets = vec![target("t1"), target("t2"), target("t3")];
        let mut screener = screener(Mode::Transactions, targets, None, &path);
        screener.seed_with(vec![
            vec![full_txn("0xa1", "0x9")],
            vec![full_txn("0xb1", "0x9")],
            vec![full_txn("0xc1", "0x9")],
        ]);

        // Target #2's fetch soft-failed and came back empty.
        let wave = vec![
            vec![full_txn("0xa2", "0x9"), full_txn("0xa1", "0x9")],
            Vec::new(),
            vec![full_txn("0xc2", "0x9"), full_txn("0xc1", "0x9")],
        ];
        for (index, fetched) in wave.into_iter().enumerate() {
            screener.process_target(index, fetched).await.unwrap();
        }

        assert_eq!(screener.snapshot(0).len(), 2);
        assert_eq!(screener.snapshot(1), &vec![full_txn("0xb1", "0x9")]);
        assert_eq!(screener.snapshot(2).len(), 2);

        let audit = std::fs::read_to_string(&path).unwrap();
        assert!(audit.contains("0xa2"));
        assert!(audit.contains("0xc2"));
        assert!(!audit.contains("0xb1"));
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn field_filter_narrows_dispatched_candidates() {
        let path = audit_path("field-filter");
        let filter = FieldFilter::new("to", "0xwanted", true);
        let mut screener =
            screener(Mode::Transactions, vec![target("t1")], Some(filter), &path);
        screener.seed_with(vec![vec![full_txn("0xa1", "0xwanted")]]);

        screener
            .process_target(
                0,
                vec![
                    full_txn("0xa3", "0xother"),
                    full_txn("0xa2", "0xwanted"),
                    full_txn("0xa1", "0xwanted"),
                ],
            )
            .await
            .unwrap();

        let audit = std::fs::read_to_string(&path).unwrap();
        assert!(audit.contains("0xa2"));
        assert!(!audit.contains("0xa3"));
        // The snapshot still advanced to the full fetched page.
        assert_eq!(screener.snapshot(0).len(), 3);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn below_minimum_token_transfer_is_audited_but_not_alerted() {
        let path = audit_path("below-minimum");
        let mut screener = screener(Mode::TokenTransfers, vec![target("t1")], None, &path);
        screener.seed_with(vec![vec![txn("0xa")]]);

        // min_amount is 10; 18 decimals round to 3 places, so this stays 9.999
        let transfer = Transaction::from_pairs(&[
            ("hash", "0xb"),
            ("value", "9999000000000000000"),
            ("tokenDecimal", "18"),
            ("tokenSymbol", "USDC"),
        ]);
        screener
            .process_target(0, vec![transfer, txn("0xa")])
            .await
            .unwrap();

        let audit = std::fs::read_to_string(&path).unwrap();
        assert!(audit.contains("0xb, 9.999 USDC swapped on ETHEREUM"));
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn schema_break_escalates_out_of_the_cycle() {
        let path = audit_path("schema-break");
        let filter = FieldFilter::new("to", "0xwanted", true);
        let mut screener =
            screener(Mode::Transactions, vec![target("t1")], Some(filter), &path);
        screener.seed_with(vec![vec![txn("0xa")]]);

        let no_to_field = Transaction::from_pairs(&[("hash", "0xb")]);
        let result = screener.process_target(0, vec![no_to_field, txn("0xa")]).await;

        assert!(result.is_err());
        std::fs::remove_file(&path).ok();
    }
}
