//! CLI command tests
//!
//! Exercise commands end to end against a temp store. AI-dependent paths are
//! covered in tally-core; here the environment has no backend configured, so
//! unmatched rows degrade to Other.

use std::io::Write;
use std::path::PathBuf;

use crate::commands::{self, truncate};

fn temp_db() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");
    (dir, path)
}

fn write_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer description", 10), "a longe...");
}

#[test]
fn test_truncate_multibyte_description() {
    // Counts characters, never slices inside a multibyte sequence
    assert_eq!(truncate("超市购物", 10), "超市购物");
    assert_eq!(truncate("超市购物卡充值记录明细", 8), "超市购物卡...");
}

#[test]
fn test_cmd_init() {
    let (_dir, db_path) = temp_db();
    assert!(commands::cmd_init(&db_path).is_ok());
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_cmd_add_then_list() {
    let (_dir, db_path) = temp_db();

    let result = commands::cmd_add(
        &db_path,
        "2024/01/15",
        "Grocery run",
        85.43,
        Some("Food"),
        false,
    )
    .await;
    assert!(result.is_ok());

    let db = commands::open_db(&db_path).unwrap();
    assert_eq!(db.count_transactions().unwrap(), 1);

    assert!(commands::cmd_list(&db_path, 10).is_ok());
}

#[tokio::test]
async fn test_cmd_add_rejects_bad_date() {
    let (_dir, db_path) = temp_db();
    let result = commands::cmd_add(&db_path, "01/15/2024", "Dinner", 20.0, Some("Food"), false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cmd_add_rejects_unknown_category() {
    let (_dir, db_path) = temp_db();
    let result =
        commands::cmd_add(&db_path, "2024/01/15", "Dinner", 20.0, Some("Snacks"), false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cmd_import_keyword_rows() {
    let (_dir, db_path) = temp_db();
    let file = write_csv(
        "date,description,amount\n\
         2024/01/15,Grocery Shopping,85.43\n\
         2024/01/12,Monthly Rent,1200.00\n",
    );

    let result = commands::cmd_import(&db_path, file.path(), true, false, 6).await;
    assert!(result.is_ok());

    let db = commands::open_db(&db_path).unwrap();
    assert_eq!(db.count_transactions().unwrap(), 2);
}

#[tokio::test]
async fn test_cmd_import_missing_file() {
    let (_dir, db_path) = temp_db();
    let result =
        commands::cmd_import(&db_path, std::path::Path::new("/nonexistent.csv"), true, false, 6)
            .await;
    assert!(result.is_err());
}
