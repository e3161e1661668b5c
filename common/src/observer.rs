//! DOM変更監視の共通部分
//!
//! - 変更バッチの判定（子ノード追加があったか）
//! - 後縁デバウンス（連続した変更を1回の再適用にまとめる）
//! - 監視状態の初期化・破棄（ページ全体で1つ）

use crate::error::Result;
use std::cell::RefCell;
use std::rc::Rc;

/// 変更レコードの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
    CharacterData,
}

impl MutationKind {
    /// MutationRecord.type の文字列から変換
    pub fn from_record_type(value: &str) -> Option<Self> {
        match value {
            "childList" => Some(MutationKind::ChildList),
            "attributes" => Some(MutationKind::Attributes),
            "characterData" => Some(MutationKind::CharacterData),
            _ => None,
        }
    }
}

/// 変更レコードの要約
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationSummary {
    pub kind: MutationKind,
    pub added_nodes: u32,
}

/// 再適用が必要なバッチか（子ノード追加を1件以上含む）
pub fn batch_requires_resync<'a, I>(batch: I) -> bool
where
    I: IntoIterator<Item = &'a MutationSummary>,
{
    batch
        .into_iter()
        .any(|m| m.kind == MutationKind::ChildList && m.added_nodes > 0)
}

// ============================================
// デバウンス
// ============================================

/// 遅延実行のスケジューラ
///
/// 返されたハンドルをdropすると、未実行のタスクは取り消される。
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// 後縁デバウンス
///
/// `trigger` のたびに保留中のタスクを取り消して予約し直す。
/// 待ち時間内に何度呼ばれても実行は最後の1回だけ。
pub struct Debouncer<S: Scheduler> {
    scheduler: S,
    delay_ms: u32,
    action: Rc<dyn Fn()>,
    pending: RefCell<Option<S::Handle>>,
}

impl<S: Scheduler> Debouncer<S> {
    pub fn new<F>(scheduler: S, delay_ms: u32, action: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            scheduler,
            delay_ms,
            action: Rc::new(action),
            pending: RefCell::new(None),
        }
    }

    pub fn trigger(&self) {
        let action = Rc::clone(&self.action);
        let handle = self.scheduler.schedule(self.delay_ms, Box::new(move || action()));
        // 古いハンドルはここでdropされ取り消される
        self.pending.replace(Some(handle));
    }

    /// 保留中のタスクを取り消す
    pub fn cancel(&self) {
        self.pending.replace(None);
    }
}

// ============================================
// 監視状態
// ============================================

/// ページ全体で1つの監視状態
///
/// 2回目以降の `init` は何もしない。`teardown` 後は再初期化できる。
pub struct Lifecycle<T> {
    slot: RefCell<Option<T>>,
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Lifecycle<T> {
    pub const fn new() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }

    /// 未初期化なら初期化する。初期化した場合は `true`
    pub fn init_with<F>(&self, init: F) -> Result<bool>
    where
        F: FnOnce() -> Result<T>,
    {
        if self.is_active() {
            return Ok(false);
        }
        let state = init()?;
        self.slot.replace(Some(state));
        Ok(true)
    }

    pub fn is_active(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// 状態を取り出して破棄可能にする
    pub fn teardown(&self) -> Option<T> {
        self.slot.borrow_mut().take()
    }

    /// 有効な状態に対して処理する
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        self.slot.borrow().as_ref().map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::Cell;

    /// 手動で時刻を進めるスケジューラ
    #[derive(Default)]
    struct ManualClock {
        now: Cell<u64>,
        queue: RefCell<Vec<(u64, Rc<Cell<bool>>, Option<Box<dyn FnOnce()>>)>>,
    }

    struct ManualHandle(Rc<Cell<bool>>);

    impl Drop for ManualHandle {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    impl Scheduler for Rc<ManualClock> {
        type Handle = ManualHandle;

        fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ManualHandle {
            let cancelled = Rc::new(Cell::new(false));
            let due = self.now.get() + u64::from(delay_ms);
            self.queue
                .borrow_mut()
                .push((due, Rc::clone(&cancelled), Some(task)));
            ManualHandle(cancelled)
        }
    }

    impl ManualClock {
        fn advance(&self, ms: u64) {
            self.now.set(self.now.get() + ms);
            let now = self.now.get();
            let due: Vec<_> = {
                let mut queue = self.queue.borrow_mut();
                let mut ready = Vec::new();
                queue.retain_mut(|(at, cancelled, task)| {
                    if *at <= now {
                        if !cancelled.get() {
                            ready.extend(task.take());
                        }
                        false
                    } else {
                        true
                    }
                });
                ready
            };
            for task in due {
                task();
            }
        }
    }

    fn counting_debouncer(clock: &Rc<ManualClock>) -> (Debouncer<Rc<ManualClock>>, Rc<Cell<u32>>) {
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        let debouncer = Debouncer::new(Rc::clone(clock), 100, move || counter.set(counter.get() + 1));
        (debouncer, runs)
    }

    #[test]
    fn test_batch_requires_resync() {
        let added = MutationSummary { kind: MutationKind::ChildList, added_nodes: 2 };
        let removed = MutationSummary { kind: MutationKind::ChildList, added_nodes: 0 };
        let attr = MutationSummary { kind: MutationKind::Attributes, added_nodes: 0 };

        assert!(batch_requires_resync(&[removed, added]));
        assert!(!batch_requires_resync(&[removed, attr]));
        let empty: [MutationSummary; 0] = [];
        assert!(!batch_requires_resync(&empty));
    }

    #[test]
    fn test_mutation_kind_from_record_type() {
        assert_eq!(MutationKind::from_record_type("childList"), Some(MutationKind::ChildList));
        assert_eq!(MutationKind::from_record_type("other"), None);
    }

    #[test]
    fn test_burst_runs_once_after_window() {
        let clock = Rc::new(ManualClock::default());
        let (debouncer, runs) = counting_debouncer(&clock);

        for _ in 0..5 {
            debouncer.trigger();
            clock.advance(20);
        }
        assert_eq!(runs.get(), 0);

        clock.advance(99);
        assert_eq!(runs.get(), 1);

        clock.advance(500);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_separate_bursts_run_separately() {
        let clock = Rc::new(ManualClock::default());
        let (debouncer, runs) = counting_debouncer(&clock);

        debouncer.trigger();
        clock.advance(100);
        debouncer.trigger();
        clock.advance(100);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_cancel() {
        let clock = Rc::new(ManualClock::default());
        let (debouncer, runs) = counting_debouncer(&clock);

        debouncer.trigger();
        debouncer.cancel();
        clock.advance(1000);
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn test_lifecycle_init_once() {
        let lifecycle: Lifecycle<u32> = Lifecycle::new();
        let mut calls = 0;

        assert!(lifecycle.init_with(|| { calls += 1; Ok(1) }).unwrap());
        assert!(!lifecycle.init_with(|| { calls += 1; Ok(2) }).unwrap());
        assert_eq!(calls, 1);
        assert_eq!(lifecycle.with(|v| *v), Some(1));

        assert_eq!(lifecycle.teardown(), Some(1));
        assert!(!lifecycle.is_active());
        assert!(lifecycle.init_with(|| Ok(3)).unwrap());
        assert_eq!(lifecycle.with(|v| *v), Some(3));
    }

    #[test]
    fn test_lifecycle_init_error_leaves_inactive() {
        let lifecycle: Lifecycle<u32> = Lifecycle::new();
        let result = lifecycle.init_with(|| Err(Error::Dom("no body".into())));
        assert!(result.is_err());
        assert!(!lifecycle.is_active());
    }
}
