//! Read-only lookups over a user collection.
//!
//! All lookups are linear scans returning the first match.

use crate::ids::UserId;
use crate::task::Task;
use crate::user::User;

/// First user whose email matches exactly (case-sensitive).
pub fn find_by_email<'a>(users: &'a [User], email: &str) -> Option<&'a User> {
    users.iter().find(|user| user.email() == email)
}

pub fn find_by_email_mut<'a>(users: &'a mut [User], email: &str) -> Option<&'a mut User> {
    users.iter_mut().find(|user| user.email() == email)
}

pub fn find_by_id(users: &[User], id: UserId) -> Option<&User> {
    users.iter().find(|user| user.id() == id)
}

pub fn find_by_id_mut(users: &mut [User], id: UserId) -> Option<&mut User> {
    users.iter_mut().find(|user| user.id() == id)
}

/// True when the task names an assignee that matches no user.
pub fn has_unknown_assignee(users: &[User], task: &Task) -> bool {
    task.assigned_to()
        .is_some_and(|email| find_by_email(users, email).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TaskId;

    fn users() -> Vec<User> {
        vec![
            User::new(UserId::new(1), "Ann", "a@x.com").expect("user"),
            User::new(UserId::new(2), "Bob", "b@x.com").expect("user"),
        ]
    }

    #[test]
    fn email_lookup_is_case_sensitive() {
        let users = users();
        assert_eq!(find_by_email(&users, "a@x.com").map(User::name), Some("Ann"));
        assert!(find_by_email(&users, "A@x.com").is_none());
        assert!(find_by_email(&users, "c@x.com").is_none());
    }

    #[test]
    fn id_lookup() {
        let mut users = users();
        assert_eq!(find_by_id(&users, UserId::new(2)).map(User::name), Some("Bob"));
        assert!(find_by_id(&users, UserId::new(3)).is_none());

        if let Some(user) = find_by_id_mut(&mut users, UserId::new(1)) {
            user.set_name("Annie").expect("name");
        }
        assert_eq!(
            find_by_email_mut(&mut users, "a@x.com").map(|user| user.name().to_string()),
            Some("Annie".to_string())
        );
    }

    #[test]
    fn unknown_assignees_are_flagged() {
        let users = users();
        let unassigned = Task::new(TaskId::new(1), "t", None).expect("task");
        let known = Task::new(TaskId::new(2), "t", Some("b@x.com".into())).expect("task");
        let unknown = Task::new(TaskId::new(3), "t", Some("z@x.com".into())).expect("task");

        assert!(!has_unknown_assignee(&users, &unassigned));
        assert!(!has_unknown_assignee(&users, &known));
        assert!(has_unknown_assignee(&users, &unknown));
    }
}
