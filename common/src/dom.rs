//! ドキュメント抽象
//!
//! 同期処理はこのトレイト越しにDOMを読み書きする。
//! ブラウザ実装は `web-wasm`、メモリ実装は [`crate::memory`]。
//! DOMハンドルは共有参照なので、書き込み系も `&self` を取る。

use crate::error::Result;

/// 要素ハンドル
pub trait ServiceElement: Clone + Sized {
    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&self, name: &str, value: &str) -> Result<()>;

    /// 子孫を含む表示テキスト
    fn text_content(&self) -> Option<String>;

    fn set_text_content(&self, text: &str);

    fn add_class(&self, class: &str) -> Result<()>;

    fn remove_class(&self, class: &str) -> Result<()>;

    fn has_class(&self, class: &str) -> bool;

    /// `<option>` の値（value属性がなければ表示テキスト）
    fn value(&self) -> Option<String>;

    /// 子孫の `<option>` 要素
    fn options(&self) -> Vec<Self>;

    /// 選択中の `<option>`
    fn selected_option(&self) -> Option<Self>;
}

/// ドキュメントハンドル
pub trait ServiceDocument {
    type Element: ServiceElement;

    /// 属性を持つ要素（文書順）
    fn elements_with_attribute(&self, name: &str) -> Vec<Self::Element>;

    /// クラスを持つ要素（文書順）
    fn elements_with_class(&self, class: &str) -> Vec<Self::Element>;

    /// name属性が一致する要素
    fn elements_by_name(&self, name: &str) -> Vec<Self::Element>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// 文書に未接続の要素を作成
    fn create_element(&self, tag: &str) -> Result<Self::Element>;
}
