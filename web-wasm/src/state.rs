//! 有効な設定とマッピングテーブル（ページ全体で共有）

use service_colors_common::{ColorConfig, MappingTable};
use std::cell::RefCell;

struct Active {
    config: ColorConfig,
    table: MappingTable,
}

thread_local! {
    static ACTIVE: RefCell<Active> = RefCell::new(Active {
        config: ColorConfig::default(),
        table: MappingTable::default_table().clone(),
    });
}

/// 設定を差し替える
pub fn set_config(config: ColorConfig) {
    let table = config.table();
    ACTIVE.with(|active| {
        *active.borrow_mut() = Active { config, table };
    });
}

pub fn config() -> ColorConfig {
    ACTIVE.with(|active| active.borrow().config.clone())
}

/// 有効な設定とテーブルで処理する
pub fn with_active<R, F>(f: F) -> R
where
    F: FnOnce(&ColorConfig, &MappingTable) -> R,
{
    ACTIVE.with(|active| {
        let active = active.borrow();
        f(&active.config, &active.table)
    })
}
