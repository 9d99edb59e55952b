//! stateflow 収束ポーラー
//!
//! クラウドのコントロールプレーンは多くの変更を非同期に適用する。作成・更新の
//! 呼び出しはすぐに返り、リソースが最終状態になるのはその後。
//! このクレートはその収束を待機する。
//!
//! # モデル
//!
//! - **プローブ**: リモート状態の1回の読み取り。[`ProbeResult`] を返す
//! - **待機仕様**: pending・target・failure の状態ラベルと、ポーリング間隔、
//!   タイムアウト、not-found 許容回数、stabilization 回数 ([`WaitSpec`])
//! - **結果**: 最後に取得したオブジェクト、または [`WaitError`]
//!
//! ```text
//!            ┌──────────── pending / unexpected / tolerated not-found ─┐
//!            ▼                                                          │
//!   ┌─────────────────┐  probe  ┌──────────────┐   sleep(interval)      │
//!   │ deadline check  ├────────▶│   observe    ├────────────────────────┘
//!   └────────┬────────┘         └──────┬───────┘
//!            │ elapsed                 │ target × stabilization / failure /
//!            ▼                         ▼ not-found budget spent / probe error
//!         Timeout                   terminal outcome
//! ```
//!
//! # 使用例
//!
//! ```ignore
//! use stateflow_wait::{await_state, ProbeResult, WaitSpec};
//!
//! let spec = WaitSpec::builder()
//!     .pending(["IN_PROGRESS"])
//!     .target(["SUCCEEDED"])
//!     .failure(["FAILED"])
//!     .timeout(Duration::from_secs(300))
//!     .build()?;
//!
//! let status = await_state(|| async {
//!     ProbeResult::from_lookup(find_create_status(&client, &id).await, |s| s.state.clone())
//! }, &spec).await?;
//! ```

pub mod convergence;
pub mod error;
pub mod probe;
pub mod retry;
pub mod spec;
pub mod waiter;

// Re-exports
pub use convergence::{Convergence, Phase, Step};
pub use error::{SpecError, WaitError};
pub use probe::ProbeResult;
pub use retry::{RetryConfig, RetryError, retry_when, retry_when_not_found};
pub use spec::{StateClass, WaitSpec, WaitSpecBuilder};
pub use tokio_util::sync::CancellationToken;
pub use waiter::{await_state, await_state_with_cancel};
