use super::*;

#[test]
fn notice_class_carries_kind_modifier() {
    assert_eq!(notice_class(NoticeKind::Success), "notice notice--success");
    assert_eq!(notice_class(NoticeKind::Warning), "notice notice--warning");
    assert_eq!(notice_class(NoticeKind::Error), "notice notice--error");
}
