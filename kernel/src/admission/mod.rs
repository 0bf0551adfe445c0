//! Booking admission rules for the event page.
//!
//! Everything in here is pure decision logic: given the current session,
//! the user's profile and a freshly fetched event snapshot, work out how
//! each space should be presented, what a click on it means, and how a
//! server-side rejection maps back onto the UI. The server stays
//! authoritative; these rules only mirror it for responsiveness.

use std::fmt;

use crate::model::{
    id::{EventId, SpaceId},
    space::SpaceColor,
    user::UserStatus,
};

pub mod flow;

pub use flow::{BookingFlow, FlowKind, FlowPhase};

/// Client-side authentication state. Anonymous visitors see the page too;
/// they are only sent to the login flow once they try to book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    LoggedIn { email: String },
}

impl Session {
    pub fn authenticated(&self) -> bool {
        matches!(self, Session::LoggedIn { .. })
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::LoggedIn { email } => Some(email),
        }
    }
}

/// The slice of the user's account the rules need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub status: UserStatus,
    /// Convenience flag; must always agree with `status == Approved`.
    pub approved: bool,
    pub booked_spaces_count: i64,
}

impl Profile {
    pub fn new(status: UserStatus, booked_spaces_count: i64) -> Self {
        Self {
            status,
            approved: status.is_approved(),
            booked_spaces_count,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.status.is_rejected()
    }
}

/// Event state as the client sees it, rebuilt from scratch on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSnapshot {
    pub id: EventId,
    pub cancelled: bool,
    pub spaces: Vec<SpaceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceSnapshot {
    pub id: SpaceId,
    pub name: String,
    pub color: SpaceColor,
    pub available: bool,
    pub booked_by: Option<String>,
}

/// How a single space card should be presented and whether it reacts to
/// clicks. Exactly one variant applies; the disqualification priority is
/// Rejected > NotApproved > OneSpaceLimit > Bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceDisplayState {
    Booked { is_mine: bool },
    AvailableRejected,
    AvailableNotApproved,
    AvailableBlockedOneSpaceLimit,
    AvailableBookable,
}

pub fn classify_space(
    session: &Session,
    profile: Option<&Profile>,
    event: &EventSnapshot,
    space: &SpaceSnapshot,
) -> SpaceDisplayState {
    if !space.available {
        let is_mine = match (space.booked_by.as_deref(), session.email()) {
            (Some(booked_by), Some(email)) => booked_by == email,
            _ => false,
        };
        return SpaceDisplayState::Booked { is_mine };
    }

    // Anonymous visitors (or a profile that has not loaded yet) always see
    // available spaces as bookable; the click sends them to login.
    let (email, profile) = match (session.email(), profile) {
        (Some(email), Some(profile)) => (email, profile),
        _ => return SpaceDisplayState::AvailableBookable,
    };

    // Rejected takes priority over every other disqualification, whatever
    // the approved flag or booking count claim.
    if profile.is_rejected() {
        return SpaceDisplayState::AvailableRejected;
    }
    if !profile.approved {
        return SpaceDisplayState::AvailableNotApproved;
    }

    // The snapshot scan backs up the server-computed count so a stale
    // count can never block the user out of a fresh event.
    let holds_other_space = profile.booked_spaces_count > 0
        || event
            .spaces
            .iter()
            .any(|s| s.id != space.id && s.booked_by.as_deref() == Some(email));
    if holds_other_space {
        return SpaceDisplayState::AvailableBlockedOneSpaceLimit;
    }

    SpaceDisplayState::AvailableBookable
}

/// What a click on a space card should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Ignore,
    ShowNotApprovedWarning,
    ShowOneSpaceLimitWarning,
    RequireLogin { space_id: SpaceId },
    ConfirmBooking { space_id: SpaceId },
}

/// `blocking_modal_open` is owned by the presentation layer: while a
/// confirmation/login dialog is up, space clicks fall through.
pub fn on_space_click(
    state: SpaceDisplayState,
    session: &Session,
    space_id: SpaceId,
    blocking_modal_open: bool,
) -> ClickAction {
    if blocking_modal_open {
        return ClickAction::Ignore;
    }
    match state {
        SpaceDisplayState::Booked { .. } => ClickAction::Ignore,
        SpaceDisplayState::AvailableRejected => ClickAction::Ignore,
        SpaceDisplayState::AvailableNotApproved => ClickAction::ShowNotApprovedWarning,
        SpaceDisplayState::AvailableBlockedOneSpaceLimit => {
            ClickAction::ShowOneSpaceLimitWarning
        }
        SpaceDisplayState::AvailableBookable => {
            if session.authenticated() {
                ClickAction::ConfirmBooking { space_id }
            } else {
                ClickAction::RequireLogin { space_id }
            }
        }
    }
}

/// Booking intent captured when an anonymous visitor clicked a space.
/// At most one exists at a time and it is consumed on the next login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingBooking {
    pub space_id: SpaceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostLoginAction {
    Noop,
    ShowNotApprovedWarning,
    ConfirmBooking { space_id: SpaceId },
}

/// Consumes the pending slot (callers pass `slot.take()`), so the action
/// fires at most once per login and never again on later re-renders.
pub fn resolve_pending_booking_after_login(
    pending: Option<PendingBooking>,
    profile: &Profile,
) -> PostLoginAction {
    match pending {
        None => PostLoginAction::Noop,
        Some(_) if !profile.approved => PostLoginAction::ShowNotApprovedWarning,
        Some(pending) => PostLoginAction::ConfirmBooking {
            space_id: pending.space_id,
        },
    }
}

/// Coarse classification of a server-side booking rejection, derived from
/// the error message text. The server's answer is authoritative; this only
/// routes the failure to the matching dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingErrorKind {
    NotApproved,
    OneSpaceLimit,
    SpaceAlreadyBooked,
    Generic,
}

pub fn classify_booking_error(message: &str) -> BookingErrorKind {
    let message = message.to_lowercase();
    if message.contains("approved") || message.contains("only approved") {
        BookingErrorKind::NotApproved
    } else if message.contains("one space") || message.contains("only book one") {
        BookingErrorKind::OneSpaceLimit
    } else if message.contains("already booked") || message.contains("space is already") {
        BookingErrorKind::SpaceAlreadyBooked
    } else {
        BookingErrorKind::Generic
    }
}

/// Server-side denial reasons with their canonical message text. The
/// repository layer raises these and `classify_booking_error` recognizes
/// them on the way back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingDenied {
    NotApproved,
    OneSpacePerEvent,
    /// One-space denial as phrased for admin book-for-user requests.
    UserAlreadyBooked,
    EventNotFound,
    SpaceNotFound,
    SpaceTaken,
    NotBooked,
    NotOwnBooking,
}

impl fmt::Display for BookingDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            BookingDenied::NotApproved => "Only approved users can book spaces",
            BookingDenied::OneSpacePerEvent => "You can only book one space per event",
            BookingDenied::UserAlreadyBooked => "User already has a booking for this event",
            BookingDenied::EventNotFound => "Event not found",
            BookingDenied::SpaceNotFound => "Space not found",
            BookingDenied::SpaceTaken => "Space is already booked",
            BookingDenied::NotBooked => "Space is not currently booked.",
            BookingDenied::NotOwnBooking => "Space is not booked by this user.",
        };
        f.write_str(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(spaces: Vec<SpaceSnapshot>) -> EventSnapshot {
        EventSnapshot {
            id: EventId::new(),
            cancelled: false,
            spaces,
        }
    }

    fn space(available: bool, booked_by: Option<&str>) -> SpaceSnapshot {
        SpaceSnapshot {
            id: SpaceId::new(),
            name: "Buddy".into(),
            color: SpaceColor::Green,
            available,
            booked_by: booked_by.map(String::from),
        }
    }

    fn logged_in(email: &str) -> Session {
        Session::LoggedIn {
            email: email.into(),
        }
    }

    #[test]
    fn unavailable_space_is_booked_and_mine_iff_emails_match() {
        let mine = space(false, Some("me@example.com"));
        let theirs = space(false, Some("other@example.com"));
        let event = snapshot(vec![mine.clone(), theirs.clone()]);
        let profile = Profile::new(UserStatus::Approved, 1);

        let session = logged_in("me@example.com");
        assert_eq!(
            classify_space(&session, Some(&profile), &event, &mine),
            SpaceDisplayState::Booked { is_mine: true }
        );
        assert_eq!(
            classify_space(&session, Some(&profile), &event, &theirs),
            SpaceDisplayState::Booked { is_mine: false }
        );
        assert_eq!(
            classify_space(&Session::Anonymous, None, &event, &mine),
            SpaceDisplayState::Booked { is_mine: false }
        );
    }

    #[test]
    fn rejected_wins_over_every_other_disqualification() {
        let target = space(true, None);
        let event = snapshot(vec![target.clone()]);
        let session = logged_in("me@example.com");

        // Even with a lying approved flag and a held booking, rejected wins.
        let profile = Profile {
            status: UserStatus::Rejected,
            approved: true,
            booked_spaces_count: 3,
        };
        assert_eq!(
            classify_space(&session, Some(&profile), &event, &target),
            SpaceDisplayState::AvailableRejected
        );
    }

    #[test]
    fn not_approved_wins_over_one_space_limit() {
        let target = space(true, None);
        let event = snapshot(vec![target.clone()]);
        let session = logged_in("me@example.com");

        for status in [UserStatus::InReview, UserStatus::PictureRequested] {
            let profile = Profile::new(status, 2);
            assert_eq!(
                classify_space(&session, Some(&profile), &event, &target),
                SpaceDisplayState::AvailableNotApproved
            );
        }
    }

    #[test]
    fn approved_user_with_existing_booking_is_blocked() {
        let target = space(true, None);
        let event = snapshot(vec![target.clone()]);
        let session = logged_in("me@example.com");
        let profile = Profile::new(UserStatus::Approved, 1);

        assert_eq!(
            classify_space(&session, Some(&profile), &event, &target),
            SpaceDisplayState::AvailableBlockedOneSpaceLimit
        );
    }

    #[test]
    fn snapshot_scan_blocks_even_when_count_is_stale() {
        let target = space(true, None);
        let held = space(false, Some("me@example.com"));
        let event = snapshot(vec![target.clone(), held]);
        let session = logged_in("me@example.com");
        // Count says zero, but the event snapshot shows a held space.
        let profile = Profile::new(UserStatus::Approved, 0);

        assert_eq!(
            classify_space(&session, Some(&profile), &event, &target),
            SpaceDisplayState::AvailableBlockedOneSpaceLimit
        );
    }

    #[test]
    fn approved_user_without_booking_can_book() {
        let target = space(true, None);
        let event = snapshot(vec![target.clone()]);
        let session = logged_in("me@example.com");
        let profile = Profile::new(UserStatus::Approved, 0);

        assert_eq!(
            classify_space(&session, Some(&profile), &event, &target),
            SpaceDisplayState::AvailableBookable
        );
    }

    #[test]
    fn anonymous_visitor_sees_available_spaces_as_bookable() {
        let target = space(true, None);
        let event = snapshot(vec![target.clone()]);

        assert_eq!(
            classify_space(&Session::Anonymous, None, &event, &target),
            SpaceDisplayState::AvailableBookable
        );
    }

    #[test]
    fn classification_is_pure() {
        let target = space(true, None);
        let event = snapshot(vec![target.clone()]);
        let session = logged_in("me@example.com");
        let profile = Profile::new(UserStatus::Approved, 0);

        let first = classify_space(&session, Some(&profile), &event, &target);
        let second = classify_space(&session, Some(&profile), &event, &target);
        assert_eq!(first, second);
    }

    #[test]
    fn declined_status_behaves_exactly_like_rejected() {
        let target = space(true, None);
        let event = snapshot(vec![target.clone()]);
        let session = logged_in("me@example.com");

        let legacy: UserStatus = "DECLINED".parse().unwrap();
        let profile = Profile::new(legacy, 0);
        assert_eq!(
            classify_space(&session, Some(&profile), &event, &target),
            SpaceDisplayState::AvailableRejected
        );
        assert_eq!(
            on_space_click(
                SpaceDisplayState::AvailableRejected,
                &session,
                target.id,
                false
            ),
            ClickAction::Ignore
        );
    }

    #[test]
    fn click_actions_follow_display_state() {
        let space_id = SpaceId::new();
        let session = logged_in("me@example.com");

        assert_eq!(
            on_space_click(SpaceDisplayState::Booked { is_mine: true }, &session, space_id, false),
            ClickAction::Ignore
        );
        assert_eq!(
            on_space_click(SpaceDisplayState::AvailableNotApproved, &session, space_id, false),
            ClickAction::ShowNotApprovedWarning
        );
        assert_eq!(
            on_space_click(
                SpaceDisplayState::AvailableBlockedOneSpaceLimit,
                &session,
                space_id,
                false
            ),
            ClickAction::ShowOneSpaceLimitWarning
        );
        assert_eq!(
            on_space_click(SpaceDisplayState::AvailableBookable, &session, space_id, false),
            ClickAction::ConfirmBooking { space_id }
        );
        assert_eq!(
            on_space_click(
                SpaceDisplayState::AvailableBookable,
                &Session::Anonymous,
                space_id,
                false
            ),
            ClickAction::RequireLogin { space_id }
        );
    }

    #[test]
    fn open_modal_swallows_every_click() {
        let space_id = SpaceId::new();
        let session = logged_in("me@example.com");

        assert_eq!(
            on_space_click(SpaceDisplayState::AvailableBookable, &session, space_id, true),
            ClickAction::Ignore
        );
    }

    #[test]
    fn pending_booking_resolves_once_then_noops() {
        let space_id = SpaceId::new();
        let mut slot = Some(PendingBooking { space_id });
        let profile = Profile::new(UserStatus::Approved, 0);

        assert_eq!(
            resolve_pending_booking_after_login(slot.take(), &profile),
            PostLoginAction::ConfirmBooking { space_id }
        );
        // The slot is spent; re-renders must not re-trigger the booking.
        assert_eq!(
            resolve_pending_booking_after_login(slot.take(), &profile),
            PostLoginAction::Noop
        );
    }

    #[test]
    fn pending_booking_for_unapproved_user_turns_into_warning() {
        let mut slot = Some(PendingBooking {
            space_id: SpaceId::new(),
        });
        let profile = Profile::new(UserStatus::InReview, 0);

        assert_eq!(
            resolve_pending_booking_after_login(slot.take(), &profile),
            PostLoginAction::ShowNotApprovedWarning
        );
        assert!(slot.is_none());
    }

    #[test]
    fn server_error_text_is_classified_by_substring() {
        assert_eq!(
            classify_booking_error("Only approved users can book"),
            BookingErrorKind::NotApproved
        );
        assert_eq!(
            classify_booking_error("You can only book one space per event"),
            BookingErrorKind::OneSpaceLimit
        );
        assert_eq!(
            classify_booking_error("SPACE IS ALREADY booked by someone else"),
            BookingErrorKind::SpaceAlreadyBooked
        );
        assert_eq!(
            classify_booking_error("connection reset"),
            BookingErrorKind::Generic
        );
    }

    #[test]
    fn canonical_denials_round_trip_through_the_classifier() {
        assert_eq!(
            classify_booking_error(&BookingDenied::NotApproved.to_string()),
            BookingErrorKind::NotApproved
        );
        assert_eq!(
            classify_booking_error(&BookingDenied::OneSpacePerEvent.to_string()),
            BookingErrorKind::OneSpaceLimit
        );
        assert_eq!(
            classify_booking_error(&BookingDenied::SpaceTaken.to_string()),
            BookingErrorKind::SpaceAlreadyBooked
        );
    }
}
