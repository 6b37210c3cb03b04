use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use uuid::Uuid;

use crate::identity::{AuthIdentity, Role};

/// Everything a caller can ask the platform to do.
///
/// Every HTTP operation maps onto exactly one of these before any state is
/// touched, so the rules in [`authorize`] are the single place that decides
/// who may do what.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CourseList,
    CourseGet,
    CourseCreate,
    CourseUpdate,
    CourseDelete,
    Enroll,
    Unenroll,
    Rate,
    RatingGet,
    RatingList,
    CartList,
    CartAdd,
    CartRemove,
    NotificationList,
    NotificationMarkRead,
    TaughtStudents,
    TeachersList,
    Me,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::CourseList => "course.list",
            Action::CourseGet => "course.get",
            Action::CourseCreate => "course.create",
            Action::CourseUpdate => "course.update",
            Action::CourseDelete => "course.delete",
            Action::Enroll => "course.enroll",
            Action::Unenroll => "course.unenroll",
            Action::Rate => "course.rate",
            Action::RatingGet => "rating.get",
            Action::RatingList => "rating.list",
            Action::CartList => "cart.list",
            Action::CartAdd => "cart.add",
            Action::CartRemove => "cart.remove",
            Action::NotificationList => "notification.list",
            Action::NotificationMarkRead => "notification.mark_read",
            Action::TaughtStudents => "teacher.students",
            Action::TeachersList => "user.teachers",
            Action::Me => "user.me",
        }
    }

    /// Actions reserved for the teacher role
    fn requires_teacher(self) -> bool {
        matches!(
            self,
            Action::CourseCreate
                | Action::CourseUpdate
                | Action::CourseDelete
                | Action::Enroll
                | Action::Unenroll
                | Action::TaughtStudents
        )
    }

    /// Actions that must be performed by the owner of the target resource
    fn checks_ownership(self) -> bool {
        matches!(
            self,
            Action::CourseUpdate
                | Action::CourseDelete
                | Action::Enroll
                | Action::Unenroll
                | Action::CartRemove
                | Action::NotificationMarkRead
        )
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "course.list" => Ok(Action::CourseList),
            "course.get" => Ok(Action::CourseGet),
            "course.create" => Ok(Action::CourseCreate),
            "course.update" => Ok(Action::CourseUpdate),
            "course.delete" => Ok(Action::CourseDelete),
            "course.enroll" => Ok(Action::Enroll),
            "course.unenroll" => Ok(Action::Unenroll),
            "course.rate" => Ok(Action::Rate),
            "rating.get" => Ok(Action::RatingGet),
            "rating.list" => Ok(Action::RatingList),
            "cart.list" => Ok(Action::CartList),
            "cart.add" => Ok(Action::CartAdd),
            "cart.remove" => Ok(Action::CartRemove),
            "notification.list" => Ok(Action::NotificationList),
            "notification.mark_read" => Ok(Action::NotificationMarkRead),
            "teacher.students" => Ok(Action::TaughtStudents),
            "user.teachers" => Ok(Action::TeachersList),
            "user.me" => Ok(Action::Me),
            _ => Err(()),
        }
    }
}

/// Machine-checkable reason a request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    NotTeacher,
    NotOwner,
}

impl DenyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "unauthenticated",
            DenyReason::NotTeacher => "not_teacher",
            DenyReason::NotOwner => "not_owner",
        }
    }
}

impl Display for DenyReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A refused action together with the reason it was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deny {
    pub action: Action,
    pub reason: DenyReason,
}

impl Display for Deny {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} denied: {}", self.action, self.reason)
    }
}

/// A record that belongs to a single user.
///
/// Ownership decisions go through this capability rather than through any
/// field-name convention, so a record type states explicitly which user
/// controls it.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// The role-level part of [`authorize`], applied before the target row is
/// loaded: refuses anonymous callers and, for teacher-reserved actions,
/// callers without the teacher role. Ownership still goes through
/// [`authorize`] once the owner is known.
pub fn authorize_role(caller: Option<&AuthIdentity>, action: Action) -> Result<(), Deny> {
    let caller = match caller {
        Some(caller) => caller,
        None => {
            return Err(Deny {
                action,
                reason: DenyReason::Unauthenticated,
            });
        }
    };

    if action.requires_teacher() && caller.role != Role::Teacher {
        return Err(Deny {
            action,
            reason: DenyReason::NotTeacher,
        });
    }

    Ok(())
}

/// Decide whether `caller` may perform `action` on a resource owned by
/// `owner`.
///
/// Rules apply in order: an anonymous caller is always refused; actions
/// reserved for teachers refuse other roles before ownership is considered;
/// ownership-checked actions then require the caller to be the owner. The
/// admin role carries no override anywhere. Ownership-checked actions deny
/// when no owner is supplied.
pub fn authorize(
    caller: Option<&AuthIdentity>,
    action: Action,
    owner: Option<Uuid>,
) -> Result<(), Deny> {
    authorize_role(caller, action)?;

    if action.checks_ownership() && owner != caller.map(|caller| caller.id) {
        return Err(Deny {
            action,
            reason: DenyReason::NotOwner,
        });
    }

    Ok(())
}
