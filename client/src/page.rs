use chrono::Utc;
use kernel::admission::{
    classify_booking_error, classify_space, on_space_click, resolve_pending_booking_after_login,
    BookingErrorKind, BookingFlow, ClickAction, EventSnapshot, FlowKind, PendingBooking,
    PostLoginAction, Profile, Session, SpaceDisplayState,
};
use kernel::model::id::SpaceId;

use crate::{
    api::{ApiClient, ApiError, UserDetailsDto},
    token::SessionStore,
};

/// Result of a confirmed submission, after the server answered and the
/// page state was re-fetched. Each variant maps to one dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was in flight, or a duplicate confirm click was swallowed.
    NotSubmitting,
    Booked { space_name: String },
    Cancelled,
    Denied(BookingErrorKind),
    ConnectionFailed,
    SessionExpired,
}

/// The booking page, headless: session cache, the latest profile/event
/// snapshots, the single pending-booking slot and one submission flow.
/// State is rebuilt wholesale after every mutation; render whatever
/// `display_states` returns and nothing else.
pub struct BookingPage {
    api: ApiClient,
    session: SessionStore,
    user_details: Option<UserDetailsDto>,
    event: Option<EventSnapshot>,
    pending: Option<PendingBooking>,
    flow: BookingFlow,
}

impl BookingPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            session: SessionStore::new(),
            user_details: None,
            event: None,
            pending: None,
            flow: BookingFlow::new(),
        }
    }

    pub fn session(&self) -> Session {
        self.session.session()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.user_details.as_ref().map(UserDetailsDto::profile)
    }

    pub fn user_details(&self) -> Option<&UserDetailsDto> {
        self.user_details.as_ref()
    }

    pub fn event(&self) -> Option<&EventSnapshot> {
        self.event.as_ref()
    }

    pub fn flow(&self) -> &BookingFlow {
        &self.flow
    }

    /// Full reload: drop an expired token, then fetch profile and event.
    /// The profile comes first so the classification below never mixes a
    /// fresh event with a stale account state.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let session = self.session.check(Utc::now());

        if session.authenticated() {
            let token = self.session.token().unwrap_or_default().to_string();
            match self.api.current_user(&token).await {
                Ok(details) => self.user_details = Some(details),
                Err(ApiError::SessionExpired) => self.invalidate_session(),
                Err(e) => return Err(e),
            }
        } else {
            self.user_details = None;
        }

        let event = self.api.upcoming_event(self.session.token()).await?;
        self.event = Some(event.into());
        Ok(())
    }

    /// Display state for every space of the current event, in order.
    pub fn display_states(&self) -> Vec<(SpaceId, SpaceDisplayState)> {
        let Some(event) = &self.event else {
            return Vec::new();
        };
        let session = self.session.session();
        let profile = self.profile();
        event
            .spaces
            .iter()
            .map(|space| {
                (
                    space.id,
                    classify_space(&session, profile.as_ref(), event, space),
                )
            })
            .collect()
    }

    pub fn classify(&self, space_id: SpaceId) -> Option<SpaceDisplayState> {
        let event = self.event.as_ref()?;
        let space = event.spaces.iter().find(|s| s.id == space_id)?;
        let session = self.session.session();
        let profile = self.profile();
        Some(classify_space(&session, profile.as_ref(), event, space))
    }

    /// A click on a space card. Captures the pending booking for
    /// anonymous visitors and opens the confirmation step for bookable
    /// clicks; everything else is routed to the matching warning.
    pub fn click_space(&mut self, space_id: SpaceId, blocking_modal_open: bool) -> ClickAction {
        let Some(event) = &self.event else {
            return ClickAction::Ignore;
        };
        // A cancelled event shows no interactive grid.
        if event.cancelled {
            return ClickAction::Ignore;
        }
        let Some(state) = self.classify(space_id) else {
            return ClickAction::Ignore;
        };

        let session = self.session.session();
        let action = on_space_click(state, &session, space_id, blocking_modal_open);
        match action {
            ClickAction::RequireLogin { space_id } => {
                self.pending = Some(PendingBooking { space_id });
            }
            ClickAction::ConfirmBooking { space_id } => {
                if !self.flow.request(FlowKind::Book, space_id) {
                    return ClickAction::Ignore;
                }
            }
            _ => {}
        }
        action
    }

    /// Opens the cancel confirmation for a space the user holds.
    pub fn request_cancel(&mut self, space_id: SpaceId) -> bool {
        match self.classify(space_id) {
            Some(SpaceDisplayState::Booked { is_mine: true }) => {
                self.flow.request(FlowKind::Cancel, space_id)
            }
            _ => false,
        }
    }

    /// Logs in, caches the credentials and consumes the pending booking.
    /// The returned action fires at most once per login.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<PostLoginAction, ApiError> {
        let response = self.api.login(email, password).await?;
        let token = response.token.clone();
        self.session.store(response.token, response.email);

        let details = self.api.current_user(&token).await?;
        let profile = details.profile();
        self.user_details = Some(details);

        let action = resolve_pending_booking_after_login(self.pending.take(), &profile);
        if let PostLoginAction::ConfirmBooking { space_id } = action {
            self.flow.request(FlowKind::Book, space_id);
        }
        Ok(action)
    }

    pub fn logout(&mut self) {
        self.invalidate_session();
        self.flow = BookingFlow::new();
    }

    /// The user confirmed the open dialog. Issues exactly one request per
    /// attempt; duplicate clicks while Submitting fall out as
    /// `NotSubmitting` without touching the network.
    pub async fn confirm(&mut self) -> SubmitOutcome {
        let Some(space_id) = self.flow.begin_submit() else {
            return SubmitOutcome::NotSubmitting;
        };
        let Some(token) = self.session.token().map(String::from) else {
            self.flow.fail(BookingErrorKind::Generic);
            self.flow.dismiss();
            self.invalidate_session();
            return SubmitOutcome::SessionExpired;
        };
        let Some(event_id) = self.event.as_ref().map(|e| e.id) else {
            self.flow.fail(BookingErrorKind::Generic);
            return SubmitOutcome::Denied(BookingErrorKind::Generic);
        };

        let result = match self.flow.kind() {
            FlowKind::Book => self
                .api
                .book_space(&token, event_id, space_id)
                .await
                .map(|booked| SubmitOutcome::Booked {
                    space_name: booked.space_name,
                }),
            FlowKind::Cancel => self
                .api
                .cancel_booking(&token, space_id)
                .await
                .map(|_| SubmitOutcome::Cancelled),
        };

        match result {
            Ok(outcome) => {
                self.flow.complete();
                // Both snapshots are refetched before the caller may
                // render, profile first, so availability is never stale.
                self.reload_after_mutation(&token).await;
                outcome
            }
            Err(ApiError::Rejected { message }) => {
                let kind = classify_booking_error(&message);
                self.flow.fail(kind);
                SubmitOutcome::Denied(kind)
            }
            Err(ApiError::SessionExpired) => {
                self.flow.fail(BookingErrorKind::Generic);
                self.flow.dismiss();
                self.invalidate_session();
                SubmitOutcome::SessionExpired
            }
            Err(ApiError::Connect(e)) => {
                tracing::warn!(error.message = %e, "submission did not reach the server");
                self.flow.fail(BookingErrorKind::Generic);
                SubmitOutcome::ConnectionFailed
            }
            Err(ApiError::Unexpected(message)) => {
                tracing::warn!(error.message = %message, "unexpected submission failure");
                self.flow.fail(BookingErrorKind::Generic);
                SubmitOutcome::Denied(BookingErrorKind::Generic)
            }
        }
    }

    /// Closes the open confirmation or outcome dialog.
    pub fn dismiss_modal(&mut self) {
        self.flow.dismiss();
    }

    async fn reload_after_mutation(&mut self, token: &str) {
        match self.api.current_user(token).await {
            Ok(details) => self.user_details = Some(details),
            Err(e) => tracing::warn!(error.message = %e, "profile reload failed"),
        }
        match self.api.upcoming_event(Some(token)).await {
            Ok(event) => self.event = Some(event.into()),
            Err(e) => tracing::warn!(error.message = %e, "event reload failed"),
        }
    }

    fn invalidate_session(&mut self) {
        self.session.clear();
        self.user_details = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::admission::{FlowPhase, SpaceSnapshot};
    use kernel::model::{id::EventId, space::SpaceColor};

    fn page_with_event(spaces: Vec<SpaceSnapshot>) -> BookingPage {
        let mut page = BookingPage::new(ApiClient::new("http://localhost:8080"));
        page.event = Some(EventSnapshot {
            id: EventId::new(),
            cancelled: false,
            spaces,
        });
        page
    }

    fn open_space(space_id: SpaceId) -> SpaceSnapshot {
        SpaceSnapshot {
            id: space_id,
            name: "Buddy".into(),
            color: SpaceColor::Green,
            available: true,
            booked_by: None,
        }
    }

    #[test]
    fn anonymous_click_captures_the_pending_booking() {
        let space_id = SpaceId::new();
        let mut page = page_with_event(vec![open_space(space_id)]);

        let action = page.click_space(space_id, false);
        assert_eq!(action, ClickAction::RequireLogin { space_id });
        assert_eq!(page.pending, Some(PendingBooking { space_id }));
    }

    #[test]
    fn click_on_cancelled_event_is_ignored() {
        let space_id = SpaceId::new();
        let mut page = page_with_event(vec![open_space(space_id)]);
        page.event.as_mut().unwrap().cancelled = true;

        assert_eq!(page.click_space(space_id, false), ClickAction::Ignore);
        assert_eq!(page.pending, None);
    }

    #[test]
    fn click_behind_open_modal_is_ignored() {
        let space_id = SpaceId::new();
        let mut page = page_with_event(vec![open_space(space_id)]);

        assert_eq!(page.click_space(space_id, true), ClickAction::Ignore);
        assert_eq!(page.pending, None);
    }

    #[test]
    fn logout_discards_the_pending_booking() {
        let space_id = SpaceId::new();
        let mut page = page_with_event(vec![open_space(space_id)]);
        page.click_space(space_id, false);
        assert!(page.pending.is_some());

        page.logout();
        assert_eq!(page.pending, None);
        assert_eq!(page.session(), Session::Anonymous);
    }

    #[tokio::test]
    async fn duplicate_confirm_never_reaches_the_network() {
        let space_id = SpaceId::new();
        let mut page = page_with_event(vec![open_space(space_id)]);
        page.flow.request(FlowKind::Book, space_id);

        // First click has moved the flow into Submitting.
        assert_eq!(page.flow.begin_submit(), Some(space_id));
        assert_eq!(page.flow.phase(), FlowPhase::Submitting { space_id });

        // The second click bails out before any request is built; with no
        // server running, reaching the network would error loudly.
        assert_eq!(page.confirm().await, SubmitOutcome::NotSubmitting);
        assert_eq!(page.flow.phase(), FlowPhase::Submitting { space_id });
    }

    #[test]
    fn cancel_request_is_gated_on_ownership() {
        let space_id = SpaceId::new();
        let mut taken = open_space(space_id);
        taken.available = false;
        taken.booked_by = Some("other@example.com".into());
        let mut page = page_with_event(vec![taken]);

        assert!(!page.request_cancel(space_id));
        assert_eq!(page.flow.phase(), FlowPhase::Viewing);
    }
}
