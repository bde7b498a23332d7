use crate::application::ports::cache::QueryKey;
use crate::shared::error::AppError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// 無効化の世代。取得開始時の値と完了時の値が違えば結果は捨てる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub epoch: u64,
    pub generation: u64,
}

type Outcome<T> = Option<Result<T, AppError>>;

struct InFlight<T> {
    id: u64,
    ticket: FetchTicket,
    outcome: watch::Receiver<Outcome<T>>,
}

struct Flights<T> {
    next_id: u64,
    by_key: HashMap<QueryKey, InFlight<T>>,
}

/// 同じキーへの同時取得を 1 回にまとめる
///
/// 最初の呼び出し元 (リーダー) だけが取得を実行し、成功でも失敗でも
/// その結果を待っている呼び出し元全員に渡す。エントリは取得の間だけ存在する。
pub struct QueryCoalescer<T> {
    flights: Mutex<Flights<T>>,
}

/// [`QueryCoalescer::join`] の結果
pub enum Flight<'a, T: Clone> {
    Leader(FlightLeader<'a, T>),
    Follower(FlightFollower<T>),
}

impl<T: Clone> QueryCoalescer<T> {
    pub fn new() -> Self {
        Self {
            flights: Mutex::new(Flights {
                next_id: 0,
                by_key: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Flights<T>> {
        self.flights.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 同じ世代の取得が進行中ならそれに合流し、なければリーダーになる
    ///
    /// 無効化より前に始まった取得には合流しない。
    pub fn join(&self, key: &QueryKey, ticket: FetchTicket) -> Flight<'_, T> {
        let mut flights = self.lock();
        if let Some(flight) = flights.by_key.get(key)
            && flight.ticket == ticket
        {
            return Flight::Follower(FlightFollower {
                outcome: flight.outcome.clone(),
            });
        }

        flights.next_id += 1;
        let id = flights.next_id;
        let (tx, rx) = watch::channel(None);
        flights.by_key.insert(
            key.clone(),
            InFlight {
                id,
                ticket,
                outcome: rx,
            },
        );
        Flight::Leader(FlightLeader {
            coalescer: self,
            key: key.clone(),
            id,
            tx,
        })
    }

    pub fn in_flight(&self) -> usize {
        self.lock().by_key.len()
    }
}

impl<T: Clone> Default for QueryCoalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 取得を実行する側。完了または破棄でエントリを外す。
pub struct FlightLeader<'a, T: Clone> {
    coalescer: &'a QueryCoalescer<T>,
    key: QueryKey,
    id: u64,
    tx: watch::Sender<Outcome<T>>,
}

impl<T: Clone> FlightLeader<'_, T> {
    /// 結果を待っている呼び出し元に渡す
    pub fn complete(self, outcome: &Result<T, AppError>) {
        self.tx.send_replace(Some(outcome.clone()));
    }
}

impl<T: Clone> Drop for FlightLeader<'_, T> {
    fn drop(&mut self) {
        let mut flights = self.coalescer.lock();
        // 無効化後に始まった別の取得に置き換わっていれば残す
        if flights
            .by_key
            .get(&self.key)
            .is_some_and(|flight| flight.id == self.id)
        {
            flights.by_key.remove(&self.key);
        }
    }
}

pub struct FlightFollower<T> {
    outcome: watch::Receiver<Outcome<T>>,
}

impl<T: Clone> FlightFollower<T> {
    /// リーダーの結果を待つ。リーダーが結果を出さずに破棄された場合は `None`。
    pub async fn wait(mut self) -> Option<Result<T, AppError>> {
        let outcome = self.outcome.wait_for(Option::is_some).await.ok()?;
        outcome.clone()
    }
}
