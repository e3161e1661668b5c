//! 同期処理テスト
//!
//! メモリ上のドキュメントで、ページ相当の構造に色分けを適用して検証

use service_colors_common::{
    apply_selection_change, apply_service_colors, create_service_label, selection_widgets,
    Category, ColorConfig, ElementOptions, MappingTable, MemoryDocument, MemoryElement,
    ServiceDocument, ServiceElement,
};

/// 予約画面相当のドキュメント
fn appointment_page() -> MemoryDocument {
    let doc = MemoryDocument::new();

    let table = MemoryElement::new("table").with_child(
        MemoryElement::new("tr")
            .with_child(
                MemoryElement::new("td").with_child(
                    MemoryElement::new("span")
                        .with_class("badge")
                        .with_attr("data-service-name", "Regular Checkup")
                        .with_text("Regular Checkup"),
                ),
            )
            .with_child(
                MemoryElement::new("td").with_child(
                    MemoryElement::new("span").with_attr("data-service-type", "filling"),
                ),
            ),
    );
    doc.append(table);

    let modal = MemoryElement::new("div")
        .with_class("modal")
        .with_child(
            MemoryElement::new("button")
                .with_class("service-btn")
                .with_attr("data-service-type", "orthodontics")
                .with_text("Braces"),
        )
        .with_child(
            MemoryElement::new("button")
                .with_class("service-btn")
                .with_child(MemoryElement::new("i").with_class("icon"))
                .with_child(MemoryElement::new("span").with_text(" Dental Extraction")),
        );
    doc.append(modal);

    doc.append(
        MemoryElement::new("select")
            .with_attr("id", "service")
            .with_attr("name", "service_id")
            .with_child(MemoryElement::new("option").with_attr("value", "").with_text("-- Select --"))
            .with_child(MemoryElement::new("option").with_attr("value", "1").with_text("Deep Cleaning"))
            .with_child(MemoryElement::new("option").with_attr("value", "2").with_text("Root Canal")),
    );

    doc
}

/// 属性を持つ要素は service-label と区分の両方を持つ
#[test]
fn test_page_labels() {
    let doc = appointment_page();
    apply_service_colors(&doc, MappingTable::default_table(), &ColorConfig::default())
        .expect("適用失敗");

    let named = &doc.elements_with_attribute("data-service-name")[0];
    assert_eq!(named.classes(), vec!["badge", "service-label", "checkup"]);

    // data-service-type を持つ要素（ボタン含む）
    let typed = doc.elements_with_attribute("data-service-type");
    assert_eq!(typed.len(), 2);
    assert!(typed.iter().all(|e| e.has_class("service-label")));
}

/// ボタンは子要素のテキストでも分類できる
#[test]
fn test_page_buttons() {
    let doc = appointment_page();
    apply_service_colors(&doc, MappingTable::default_table(), &ColorConfig::default())
        .expect("適用失敗");

    let buttons = doc.elements_with_class("service-btn");
    assert!(buttons[0].has_class("orthodontics"));
    assert!(buttons[1].has_class("extraction"));
    assert!(!buttons[1].has_class("service-label"));
}

/// 2回適用しても結果は同じ
#[test]
fn test_apply_twice_is_stable() {
    let doc = appointment_page();
    let config = ColorConfig::default();
    let table = config.table();

    let first = apply_service_colors(&doc, &table, &config).expect("適用失敗");
    let html = doc.body().outer_html();
    let second = apply_service_colors(&doc, &table, &config).expect("適用失敗");

    assert_eq!(first, second);
    assert_eq!(doc.body().outer_html(), html);
}

/// 後から追加された要素も再適用で色分けされる
#[test]
fn test_reapply_after_insert() {
    let doc = appointment_page();
    let config = ColorConfig::default();
    apply_service_colors(&doc, MappingTable::default_table(), &config).expect("適用失敗");

    let injected = MemoryElement::new("span").with_attr("data-service-name", "Teeth Whitening");
    doc.append(injected.clone());
    assert!(injected.classes().is_empty());

    apply_service_colors(&doc, MappingTable::default_table(), &config).expect("適用失敗");
    assert_eq!(injected.classes(), vec!["service-label", "whitening"]);
}

/// 選択変更ではウィジェットの区分は常に1つ
#[test]
fn test_dropdown_single_slot() {
    let doc = appointment_page();
    let config = ColorConfig::default();
    let widgets = selection_widgets(&doc, &config);
    // id="service" と name="service_id" は同じ要素
    assert_eq!(widgets.len(), 1);

    let select = &widgets[0];
    for index in [1, 2, 1, 2, 2] {
        select.select(index);
        apply_selection_change(select, MappingTable::default_table()).expect("更新失敗");
        let count = Category::all_classes().filter(|c| select.has_class(c)).count();
        assert_eq!(count, 1);
    }
    assert!(select.has_class("root_canal"));
}

/// 生成したラベル
#[test]
fn test_create_label_deep_cleaning() {
    let doc = MemoryDocument::new();
    let label = create_service_label(
        &doc,
        MappingTable::default_table(),
        "Deep Cleaning",
        None,
        &ElementOptions::default(),
    )
    .expect("生成失敗");

    assert!(label.has_class("service-label"));
    assert!(label.has_class("cleaning"));
    assert_eq!(label.text_content().as_deref(), Some("Deep Cleaning"));
}
