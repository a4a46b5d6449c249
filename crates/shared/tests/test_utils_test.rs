//! test_utils 模块的集成测试
//!
//! 验证测试工具模块的功能正确性

use chrono::{Duration, Utc};
use survey_shared::test_utils::*;

#[test]
fn test_user_id_is_unique_and_bounded() {
    let a = test_user_id("alice");
    let b = test_user_id("alice");

    assert_ne!(a, b);
    assert!(a.starts_with("alice-"));
    assert!(a.len() <= 32);
}

#[test]
fn test_unique_title_is_bounded() {
    let long_prefix = "a very long questionnaire title prefix that overflows";
    let title = unique_title(long_prefix);
    assert!(title.chars().count() <= 50);
    assert_ne!(unique_title("Q"), unique_title("Q"));
}

#[test]
fn test_assert_time_within_accepts_small_gap() {
    let now = Utc::now();
    TestAssertions::assert_time_within(now, now + Duration::milliseconds(300), Duration::seconds(1));
}

#[test]
#[should_panic]
fn test_assert_time_within_rejects_large_gap() {
    let now = Utc::now();
    TestAssertions::assert_time_within(now, now + Duration::minutes(5), Duration::seconds(1));
}

#[test]
fn test_database_config_for_tests() {
    let config = test_database_config();
    assert_eq!(config.max_connections, 5);
    assert!(config.url.starts_with("postgres://"));
}
