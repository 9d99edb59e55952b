//! 状態プローブ
//!
//! プローブはリソースの現在状態を1回読み取る処理。呼び出し側は任意のAPIを
//! ラップし、レスポンスを [`ProbeResult`] に変換する:
//! 「見つからない」系のエラーは [`ProbeResult::NotFound`]、
//! それ以外のエラーは [`ProbeResult::Error`] になる。

use std::fmt;

/// 状態プローブ1回分の結果
pub enum ProbeResult<T> {
    /// リソースが存在し、`state` を報告している
    Found { object: T, state: String },

    /// リソースが（まだ、またはもう）存在しない
    NotFound,

    /// リソース状態とは無関係な理由で読み取り自体が失敗
    Error(anyhow::Error),
}

impl<T> ProbeResult<T> {
    pub fn found(object: T, state: impl Into<String>) -> Self {
        ProbeResult::Found {
            object,
            state: state.into(),
        }
    }

    pub fn error(cause: impl Into<anyhow::Error>) -> Self {
        ProbeResult::Error(cause.into())
    }

    /// 検索系の関数の結果からプローブ結果を作成
    ///
    /// `Ok(None)` は `NotFound` になる。`state` は見つかったオブジェクトから
    /// 状態ラベルを導出する（状態フィールドのないAPIでは固定値を返せばよい）。
    pub fn from_lookup<F>(lookup: anyhow::Result<Option<T>>, state: F) -> Self
    where
        F: FnOnce(&T) -> String,
    {
        match lookup {
            Ok(Some(object)) => {
                let state = state(&object);
                ProbeResult::Found { object, state }
            }
            Ok(None) => ProbeResult::NotFound,
            Err(e) => ProbeResult::Error(e),
        }
    }

    /// 状態ラベル（リソースが見つかった場合のみ）
    pub fn state(&self) -> Option<&str> {
        match self {
            ProbeResult::Found { state, .. } => Some(state),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProbeResult::NotFound)
    }

    pub fn map<U, F>(self, f: F) -> ProbeResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ProbeResult::Found { object, state } => ProbeResult::Found {
                object: f(object),
                state,
            },
            ProbeResult::NotFound => ProbeResult::NotFound,
            ProbeResult::Error(e) => ProbeResult::Error(e),
        }
    }
}

impl<T> fmt::Debug for ProbeResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeResult::Found { state, .. } => f.debug_struct("Found").field("state", state).finish(),
            ProbeResult::NotFound => write!(f, "NotFound"),
            ProbeResult::Error(e) => f.debug_tuple("Error").field(e).finish(),
        }
    }
}
