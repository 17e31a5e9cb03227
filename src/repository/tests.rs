//! Repository Integration Tests
//!
//! Tests for the layout and menu repositories with in-memory SQLite.

#[cfg(test)]
mod tests {
    use crate::domain::{Column, DomainError, LayoutItem, MenuItem, OrderUpdate, WidgetSettings};
    use crate::repository::{init_db, LayoutRepository, MenuRepository, OrderStore, Repository};
    use std::path::PathBuf;

    async fn setup_layout_repo() -> LayoutRepository {
        let db_state = init_db(&PathBuf::from(":memory:")).await.expect("Failed to init test DB");
        LayoutRepository::new(db_state.shared())
    }

    async fn setup_menu_repo() -> MenuRepository {
        let db_state = init_db(&PathBuf::from(":memory:")).await.expect("Failed to init test DB");
        MenuRepository::new(db_state.shared())
    }

    fn widget(id: &str, column: Column, order: u32) -> LayoutItem {
        let mut item = LayoutItem::new(
            id,
            column,
            WidgetSettings::BoardList {
                board_id: "notice".to_string(),
                limit: 3,
                style: Default::default(),
                show_date: true,
            },
        )
        .with_title(format!("Widget {}", id));
        item.order = order;
        item
    }

    fn menu(id: &str, parent: Option<&str>, order: u32) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            order,
            label: id.to_string(),
            url: Some(format!("/{}", id)),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_widget() {
        let repo = setup_layout_repo().await;

        let created = repo.create(&widget("w1", Column::Left, 0)).await.expect("Failed to create");
        let found = repo.find_by_id("w1".to_string()).await.expect("Find failed");

        assert_eq!(found, Some(created));
        assert!(repo.find_by_id("nope".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_widget_is_conflict() {
        let repo = setup_layout_repo().await;
        repo.create(&widget("w1", Column::Left, 0)).await.unwrap();

        let err = repo.create(&widget("w1", Column::Main, 0)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_widgets_sorted_by_position() {
        let repo = setup_layout_repo().await;
        repo.create(&widget("b", Column::Main, 1)).await.unwrap();
        repo.create(&widget("a", Column::Main, 0)).await.unwrap();
        repo.create(&widget("l", Column::Left, 0)).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["l", "a", "b"]);
    }

    #[tokio::test]
    async fn test_apply_update_moves_widget() {
        let repo = setup_layout_repo().await;
        repo.create(&widget("w1", Column::Left, 0)).await.unwrap();

        repo.apply_update(&OrderUpdate::in_column("w1", 2, Column::Right)).await.unwrap();

        let found = repo.find_by_id("w1".to_string()).await.unwrap().unwrap();
        assert_eq!((found.column, found.order), (Column::Right, 2));
        assert_eq!(found.title, "Widget w1");
    }

    #[tokio::test]
    async fn test_apply_update_rejects_wrong_placement() {
        let repo = setup_layout_repo().await;
        repo.create(&widget("w1", Column::Left, 0)).await.unwrap();

        let err = repo
            .apply_update(&OrderUpdate::under_parent("w1", 0, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_apply_batch_reports_failures() {
        let repo = setup_layout_repo().await;
        repo.create(&widget("a", Column::Main, 0)).await.unwrap();
        repo.create(&widget("b", Column::Main, 1)).await.unwrap();

        let report = repo
            .apply_batch(&[
                OrderUpdate::in_column("b", 0, Column::Main),
                OrderUpdate::in_column("ghost", 1, Column::Main),
                OrderUpdate::in_column("a", 1, Column::Main),
            ])
            .await;

        assert!(!report.is_success());
        assert_eq!(report.applied, vec!["b", "a"]);
        assert_eq!(report.failed_ids(), vec!["ghost"]);
        assert!(report.failed[0].1.is_not_found());

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_widget() {
        let repo = setup_layout_repo().await;
        let mut item = repo.create(&widget("w1", Column::Main, 0)).await.unwrap();

        item.widget = WidgetSettings::Html { content: "<p>hi</p>".to_string() };
        repo.update(&item).await.unwrap();
        let found = repo.find_by_id("w1".to_string()).await.unwrap().unwrap();
        assert_eq!(found.widget, item.widget);

        repo.delete("w1".to_string()).await.unwrap();
        assert!(repo.find_by_id("w1".to_string()).await.unwrap().is_none());
        assert!(repo.delete("w1".to_string()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_menu_round_trip() {
        let repo = setup_menu_repo().await;
        repo.create(&menu("about", None, 0)).await.unwrap();
        repo.create(&menu("team", Some("about"), 0)).await.unwrap();

        let found = repo.find_by_id("team".to_string()).await.unwrap().unwrap();
        assert_eq!(found, menu("team", Some("about"), 0));
    }

    #[tokio::test]
    async fn test_menu_list_puts_roots_first() {
        let repo = setup_menu_repo().await;
        repo.create(&menu("a1", Some("a"), 0)).await.unwrap();
        repo.create(&menu("b", None, 1)).await.unwrap();
        repo.create(&menu("a", None, 0)).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["a", "b", "a1"]);
    }

    #[tokio::test]
    async fn test_menu_apply_update_changes_parent() {
        let repo = setup_menu_repo().await;
        repo.create(&menu("a", None, 0)).await.unwrap();
        repo.create(&menu("b", None, 1)).await.unwrap();

        repo.apply_update(&OrderUpdate::under_parent("b", 0, Some("a".to_string())))
            .await
            .unwrap();

        let found = repo.find_by_id("b".to_string()).await.unwrap().unwrap();
        assert_eq!(found.parent_id.as_deref(), Some("a"));
        assert_eq!(found.order, 0);
    }

    #[tokio::test]
    async fn test_menu_delete_cascades() {
        let repo = setup_menu_repo().await;
        repo.create(&menu("a", None, 0)).await.unwrap();
        repo.create(&menu("a1", Some("a"), 0)).await.unwrap();
        repo.create(&menu("b", None, 1)).await.unwrap();

        repo.delete("a".to_string()).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[tokio::test]
    async fn test_uninitialized_connection_errors() {
        let state = crate::repository::DbState::new(PathBuf::from("unused.db"));
        let repo = MenuRepository::new(state.shared());
        assert!(matches!(repo.list().await, Err(DomainError::Internal(_))));
    }
}
