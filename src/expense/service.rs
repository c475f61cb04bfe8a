//! The expense record service: validates requests, runs them against the
//! store under a deadline and reports the outcome.

use std::{sync::Arc, time::Duration};

use crate::{
    Error,
    expense::{
        Expense, ExpenseId, ExpensePayload, ExpenseQuery, ListParams, validation::now_millis,
    },
    stores::{CommitGate, ExpenseStore},
};

/// How long a store operation may take before it is abandoned.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates, lists, replaces and deletes expenses in a store.
///
/// Cloning the service is cheap, clones share the same store.
#[derive(Clone)]
pub struct ExpenseService {
    store: Arc<dyn ExpenseStore>,
    store_timeout: Duration,
}

impl std::fmt::Debug for ExpenseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseService")
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

impl ExpenseService {
    /// Create a service backed by `store` where each store operation must
    /// finish within `store_timeout`.
    pub fn new(store: Arc<dyn ExpenseStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    /// Validate `payload` and store it as a new expense.
    ///
    /// An unset or zero timestamp is replaced with the current time.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Validation] if `payload` breaks a constraint, nothing is stored,
    /// - or [Error::Storage] if the store failed or timed out.
    pub async fn create(&self, payload: ExpensePayload) -> Result<(), Error> {
        let data = payload.validate()?.with_default_timestamp(now_millis());

        let id = self.run("create", move |store, gate| store.create(data, gate)).await?;
        tracing::debug!("created expense {id}");

        Ok(())
    }

    /// Get the expenses of `user_id` that match `params`, newest first.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidQuery] if a parameter is not an integer,
    /// - [Error::Decoding] if a stored expense could not be read,
    /// - or [Error::Storage] if the store failed or timed out.
    pub async fn list(&self, user_id: &str, params: &ListParams) -> Result<Vec<Expense>, Error> {
        let query = ExpenseQuery::from_params(user_id, params)?;

        self.run("find", move |store, _| store.find(&query)).await
    }

    /// Replace every field of the expense `id` with `payload`.
    ///
    /// Unlike [ExpenseService::create], the timestamp is stored exactly as
    /// given, so an unset timestamp is stored as zero.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Validation] if `payload` breaks a constraint, nothing is stored,
    /// - [Error::NotFound] if there is no expense with the ID `id`,
    /// - or [Error::Storage] if the store failed or timed out.
    pub async fn update(&self, id: ExpenseId, payload: ExpensePayload) -> Result<(), Error> {
        let data = payload.validate()?;

        match self
            .run("replace", move |store, gate| store.replace(id, data, gate))
            .await?
        {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }

    /// Remove the expense `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if there is no expense with the ID `id`,
    /// - or [Error::Storage] if the store failed or timed out.
    pub async fn delete(&self, id: ExpenseId) -> Result<(), Error> {
        match self
            .run("delete", move |store, gate| store.delete(id, gate))
            .await?
        {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }

    /// Run `operation` on a blocking thread, giving up once the store timeout
    /// has elapsed.
    ///
    /// On timeout the operation's [CommitGate] is abandoned, so a write that
    /// has not committed yet is rolled back by the store. If the store had
    /// already started committing, the commit is awaited instead and its
    /// outcome reported.
    async fn run<T, F>(&self, name: &'static str, operation: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ExpenseStore, &CommitGate) -> Result<T, Error> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let gate = CommitGate::new();
        let store_gate = gate.clone();
        let mut task =
            tokio::task::spawn_blocking(move || operation(store.as_ref(), &store_gate));

        match tokio::time::timeout(self.store_timeout, &mut task).await {
            Ok(joined) => flatten_join(name, joined),
            Err(_) if gate.try_abandon() => {
                tracing::error!(
                    "store operation {name} timed out after {:?}",
                    self.store_timeout
                );
                Err(Error::Storage(format!(
                    "{name} timed out after {:?}",
                    self.store_timeout
                )))
            }
            Err(_) => {
                tracing::warn!("store operation {name} passed its deadline while committing");
                flatten_join(name, task.await)
            }
        }
    }
}

fn flatten_join<T>(
    name: &'static str,
    joined: Result<Result<T, Error>, tokio::task::JoinError>,
) -> Result<T, Error> {
    joined.unwrap_or_else(|join_error| {
        tracing::error!("store operation {name} did not complete: {join_error}");
        Err(Error::Storage(format!(
            "{name} did not complete: {join_error}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        thread,
        time::Duration,
    };

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        expense::{
            Expense, ExpenseData, ExpenseId, ExpensePayload, ExpenseQuery, ListParams,
            validation::now_millis,
        },
        stores::{CommitGate, ExpenseStore, RowsAffected, sqlite::SQLiteExpenseStore},
    };

    use super::{DEFAULT_STORE_TIMEOUT, ExpenseService};

    fn get_test_service() -> (ExpenseService, SQLiteExpenseStore) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let store = SQLiteExpenseStore::new(Arc::new(Mutex::new(connection)));

        (
            ExpenseService::new(Arc::new(store.clone()), DEFAULT_STORE_TIMEOUT),
            store,
        )
    }

    fn payload(amount: f64, user_id: &str, timestamp: Option<i64>) -> ExpensePayload {
        ExpensePayload {
            amount: Some(amount),
            category: Some(2),
            timestamp,
            user_id: Some(user_id.to_owned()),
            ..Default::default()
        }
    }

    fn all_expenses(store: &SQLiteExpenseStore, user_id: &str) -> Vec<Expense> {
        store
            .find(&ExpenseQuery::for_user(user_id))
            .expect("Could not query expenses")
    }

    #[tokio::test]
    async fn create_defaults_missing_timestamp_to_now() {
        let (service, store) = get_test_service();
        let before = now_millis();

        service.create(payload(50.0, "u1", None)).await.unwrap();

        let after = now_millis();
        let got = all_expenses(&store, "u1");
        assert_eq!(got.len(), 1);
        assert!(
            (before..=after).contains(&got[0].timestamp),
            "timestamp {} is not between {before} and {after}",
            got[0].timestamp
        );
    }

    #[tokio::test]
    async fn create_defaults_zero_timestamp_to_now() {
        let (service, store) = get_test_service();
        let before = now_millis();

        service.create(payload(50.0, "u1", Some(0))).await.unwrap();

        let got = all_expenses(&store, "u1");
        assert!(got[0].timestamp >= before);
    }

    #[tokio::test]
    async fn create_keeps_supplied_timestamp() {
        let (service, store) = get_test_service();

        service.create(payload(50.0, "u1", Some(100))).await.unwrap();

        assert_eq!(all_expenses(&store, "u1")[0].timestamp, 100);
    }

    #[tokio::test]
    async fn create_invalid_expense_stores_nothing() {
        let (service, store) = get_test_service();

        let negative_amount = service.create(payload(-5.0, "u1", None)).await;
        let empty_user = service.create(payload(5.0, "", None)).await;

        assert!(matches!(negative_amount, Err(Error::Validation(_))));
        assert!(matches!(empty_user, Err(Error::Validation(_))));
        assert_eq!(all_expenses(&store, "u1"), vec![]);
        assert_eq!(all_expenses(&store, ""), vec![]);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let (service, _) = get_test_service();
        service.create(payload(1.0, "u1", Some(100))).await.unwrap();
        service.create(payload(2.0, "u1", Some(200))).await.unwrap();
        service.create(payload(3.0, "u2", Some(300))).await.unwrap();

        let got = service.list("u1", &ListParams::default()).await.unwrap();

        let timestamps: Vec<i64> = got.iter().map(|expense| expense.timestamp).collect();
        assert_eq!(timestamps, vec![200, 100]);
    }

    #[tokio::test]
    async fn list_rejects_invalid_params() {
        let (service, _) = get_test_service();
        let params = ListParams {
            to: Some("tomorrow".to_owned()),
            ..Default::default()
        };

        let got = service.list("u1", &params).await;

        assert!(
            matches!(got, Err(Error::InvalidQuery { parameter: "to", .. })),
            "got {got:?}"
        );
    }

    #[tokio::test]
    async fn update_replaces_expense_without_defaulting_timestamp() {
        let (service, store) = get_test_service();
        service.create(payload(1.0, "u1", Some(100))).await.unwrap();
        let id = all_expenses(&store, "u1")[0].id;

        service
            .update(id, payload(7.5, "u1", None))
            .await
            .expect("Could not update expense");

        let got = all_expenses(&store, "u1");
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, id);
        assert_eq!(got[0].amount, 7.5);
        assert_eq!(got[0].timestamp, 0);
    }

    #[tokio::test]
    async fn update_invalid_expense_changes_nothing() {
        let (service, store) = get_test_service();
        service.create(payload(1.0, "u1", Some(100))).await.unwrap();
        let want = all_expenses(&store, "u1");

        let got = service.update(want[0].id, payload(0.0, "u1", None)).await;

        assert!(matches!(got, Err(Error::Validation(_))), "got {got:?}");
        assert_eq!(all_expenses(&store, "u1"), want);
    }

    #[tokio::test]
    async fn update_missing_expense_fails() {
        let (service, _) = get_test_service();

        let got = service.update(ExpenseId::new(), payload(1.0, "u1", None)).await;

        assert_eq!(got, Err(Error::NotFound));
    }

    #[tokio::test]
    async fn delete_twice_fails_the_second_time() {
        let (service, store) = get_test_service();
        service.create(payload(1.0, "u1", Some(100))).await.unwrap();
        let id = all_expenses(&store, "u1")[0].id;

        assert_eq!(service.delete(id).await, Ok(()));
        assert_eq!(service.delete(id).await, Err(Error::NotFound));
        assert_eq!(all_expenses(&store, "u1"), vec![]);
    }

    /// A SQLite store that waits before every call, so it always misses a
    /// short deadline.
    struct SlowStore {
        delay: Duration,
        inner: SQLiteExpenseStore,
    }

    impl ExpenseStore for SlowStore {
        fn create(&self, data: ExpenseData, gate: &CommitGate) -> Result<ExpenseId, Error> {
            thread::sleep(self.delay);
            self.inner.create(data, gate)
        }

        fn find(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, Error> {
            thread::sleep(self.delay);
            self.inner.find(query)
        }

        fn replace(
            &self,
            id: ExpenseId,
            data: ExpenseData,
            gate: &CommitGate,
        ) -> Result<RowsAffected, Error> {
            thread::sleep(self.delay);
            self.inner.replace(id, data, gate)
        }

        fn delete(&self, id: ExpenseId, gate: &CommitGate) -> Result<RowsAffected, Error> {
            thread::sleep(self.delay);
            self.inner.delete(id, gate)
        }
    }

    const SLOW_STORE_DELAY: Duration = Duration::from_millis(200);

    /// A service that gives up long before its store answers, along with the
    /// store underneath so tests can check what was actually written.
    fn get_slow_service() -> (ExpenseService, SQLiteExpenseStore) {
        let (_, inner) = get_test_service();
        let store = SlowStore {
            delay: SLOW_STORE_DELAY,
            inner: inner.clone(),
        };

        (
            ExpenseService::new(Arc::new(store), Duration::from_millis(20)),
            inner,
        )
    }

    fn assert_timed_out<T: std::fmt::Debug>(got: Result<T, Error>) {
        match got {
            Err(Error::Storage(message)) => assert!(
                message.contains("timed out"),
                "message \"{message}\" should mention the timeout"
            ),
            other => panic!("want a storage error, got {other:?}"),
        }
    }

    /// Long enough for the abandoned store call to finish in the background.
    async fn wait_for_abandoned_call() {
        tokio::time::sleep(SLOW_STORE_DELAY * 3).await;
    }

    #[tokio::test]
    async fn slow_store_operations_time_out() {
        let (service, _) = get_slow_service();

        assert_timed_out(service.create(payload(1.0, "u1", None)).await);
        assert_timed_out(service.list("u1", &ListParams::default()).await);
        assert_timed_out(service.update(ExpenseId::new(), payload(2.0, "u1", None)).await);
        assert_timed_out(service.delete(ExpenseId::new()).await);
    }

    #[tokio::test]
    async fn timed_out_create_leaves_no_expense_behind() {
        let (service, store) = get_slow_service();

        assert_timed_out(service.create(payload(1.0, "u1", Some(100))).await);
        wait_for_abandoned_call().await;

        assert_eq!(all_expenses(&store, "u1"), vec![]);
    }

    #[tokio::test]
    async fn timed_out_update_leaves_expense_unchanged() {
        let (service, store) = get_slow_service();
        store
            .create(
                payload(1.0, "u1", Some(100)).validate().unwrap(),
                &CommitGate::new(),
            )
            .unwrap();
        let want = all_expenses(&store, "u1");

        assert_timed_out(service.update(want[0].id, payload(9.0, "u1", Some(900))).await);
        wait_for_abandoned_call().await;

        assert_eq!(all_expenses(&store, "u1"), want);
    }

    #[tokio::test]
    async fn timed_out_delete_leaves_expense_in_place() {
        let (service, store) = get_slow_service();
        store
            .create(
                payload(1.0, "u1", Some(100)).validate().unwrap(),
                &CommitGate::new(),
            )
            .unwrap();
        let want = all_expenses(&store, "u1");

        assert_timed_out(service.delete(want[0].id).await);
        wait_for_abandoned_call().await;

        assert_eq!(all_expenses(&store, "u1"), want);
    }
}
