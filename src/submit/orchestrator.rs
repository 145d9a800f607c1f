//! Staged submission: validate everything, then make the simulated call
//!
//! The remote call only happens once every field passed. While it is in
//! flight the submit control is busy; the busy state is cleared on every
//! exit path, including the submit future being dropped.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use super::remote::{Granted, RemoteAuthority, RemoteFailure, SubmitRequest};
use super::result::{FieldError, FieldErrorKind, SubmissionResult};
use crate::config::FlowConfig;
use crate::gateway::{BusyControl, Cue, PresentationGateway, Severity};
use crate::state::{FieldKind, FlowKind, Form, FormField, LoginForm, SignupForm};
use crate::storage::{KeyValueStore, UserRecord};
use crate::validation::{fields_match, validate_email, validate_password_length};

/// Notification shown when a submit is refused locally
pub const INVALID_FORM_MESSAGE: &str = "Please fill all required fields correctly.";

/// A form that can be handed to [`SubmissionOrchestrator::submit`]
pub trait Submission: Form {
    /// Control that shows the busy indicator
    fn busy_control(&self) -> BusyControl;

    /// Payload for the remote authority
    fn request(&self) -> SubmitRequest;

    /// Errors that involve more than one field
    fn cross_field_errors(&self) -> Vec<FieldError> {
        Vec::new()
    }

    /// Record to persist after success, if any
    fn record(&self, _created_at: DateTime<Utc>) -> Option<UserRecord> {
        None
    }
}

impl Submission for LoginForm {
    fn busy_control(&self) -> BusyControl {
        BusyControl::LoginButton
    }

    fn request(&self) -> SubmitRequest {
        SubmitRequest::Login {
            email: self.email.as_text().trim().to_string(),
            password: self.password.as_text().to_string(),
        }
    }
}

impl Submission for SignupForm {
    fn busy_control(&self) -> BusyControl {
        BusyControl::SignupButton
    }

    fn request(&self) -> SubmitRequest {
        SubmitRequest::Signup {
            first_name: self.first_name.as_text().trim().to_string(),
            last_name: self.last_name.as_text().trim().to_string(),
            username: self.username.as_text().trim().to_string(),
            email: self.email.as_text().trim().to_string(),
            password: self.password.as_text().to_string(),
        }
    }

    fn cross_field_errors(&self) -> Vec<FieldError> {
        let password = self.password.as_text();
        let confirm = self.confirm_password.as_text();
        if !password.is_empty() && !confirm.is_empty() && !fields_match(password, confirm) {
            vec![FieldError::new(&self.confirm_password.name, FieldErrorKind::Mismatch)]
        } else {
            Vec::new()
        }
    }

    fn record(&self, created_at: DateTime<Utc>) -> Option<UserRecord> {
        Some(UserRecord::from_signup(self, created_at))
    }
}

/// Check every field and collect all failures
///
/// A blank required field yields a single `Required` error; format checks
/// only run on fields that hold something.
pub fn validate_fields<'a>(
    fields: impl IntoIterator<Item = &'a FormField>,
    password_min_length: usize,
) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for field in fields {
        if field.is_blank() {
            if field.required {
                errors.push(FieldError::new(&field.name, FieldErrorKind::Required));
            }
            continue;
        }

        match field.kind {
            FieldKind::Email if !validate_email(field.as_text()) => {
                errors.push(FieldError::new(&field.name, FieldErrorKind::InvalidEmail));
            }
            FieldKind::Password
                if !validate_password_length(field.as_text(), password_min_length) =>
            {
                errors.push(FieldError::new(
                    &field.name,
                    FieldErrorKind::TooShort {
                        min: password_min_length,
                    },
                ));
            }
            _ => {}
        }
    }
    errors
}

/// Tell the user a form was refused
///
/// One generic notice, then one per distinct format problem. Blank and
/// mismatched fields are only flagged on the field itself.
pub fn notify_invalid(gateway: &dyn PresentationGateway, errors: &[FieldError]) {
    gateway.notify(INVALID_FORM_MESSAGE, Severity::Error);

    let mut sent: Vec<String> = Vec::new();
    for error in errors {
        if !matches!(
            error.kind,
            FieldErrorKind::InvalidEmail | FieldErrorKind::TooShort { .. }
        ) {
            continue;
        }
        let message = error.message();
        if !sent.contains(&message) {
            gateway.notify(&message, Severity::Error);
            sent.push(message);
        }
    }
}

/// Settings the orchestrator reads from [`FlowConfig`]
#[derive(Debug, Clone)]
pub struct SubmitPolicy {
    pub password_min_length: usize,
    pub remote_timeout: Duration,
    pub remote_retries: u32,
    pub redirect_delay: Duration,
    pub storage_key: String,
    pub signup_redirect: String,
    pub login_redirect: String,
}

impl SubmitPolicy {
    pub fn from_config(config: &FlowConfig) -> Self {
        Self {
            password_min_length: config.password_min_length(),
            remote_timeout: config.remote_timeout(),
            remote_retries: config.remote_retries(),
            redirect_delay: config.redirect_delay(),
            storage_key: config.storage_key().to_string(),
            signup_redirect: config.signup_redirect().to_string(),
            login_redirect: config.login_redirect().to_string(),
        }
    }

    fn redirect_for(&self, kind: FlowKind) -> &str {
        match kind {
            FlowKind::Login => &self.login_redirect,
            FlowKind::Signup => &self.signup_redirect,
        }
    }
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self::from_config(&FlowConfig::default())
    }
}

/// Clears the busy indicator when dropped
struct BusyGuard<'a> {
    gateway: &'a dyn PresentationGateway,
    control: BusyControl,
}

impl<'a> BusyGuard<'a> {
    fn show(gateway: &'a dyn PresentationGateway, control: BusyControl) -> Self {
        gateway.show_busy(control);
        Self { gateway, control }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.gateway.clear_busy(self.control);
    }
}

pub struct SubmissionOrchestrator {
    authority: Arc<dyn RemoteAuthority>,
    store: Arc<dyn KeyValueStore>,
    gateway: Arc<dyn PresentationGateway>,
    policy: SubmitPolicy,
}

impl SubmissionOrchestrator {
    pub fn new(
        authority: Arc<dyn RemoteAuthority>,
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn PresentationGateway>,
        policy: SubmitPolicy,
    ) -> Self {
        Self {
            authority,
            store,
            gateway,
            policy,
        }
    }

    pub fn policy(&self) -> &SubmitPolicy {
        &self.policy
    }

    /// All field errors of `form`, without side effects
    pub fn validate<F: Submission>(&self, form: &F) -> Vec<FieldError> {
        let mut errors = validate_fields(form.fields(), self.policy.password_min_length);
        errors.extend(form.cross_field_errors());
        errors
    }

    pub async fn submit<F: Submission>(&self, form: &F) -> SubmissionResult {
        let kind = form.kind();
        let field_errors = self.validate(form);
        if !field_errors.is_empty() {
            tracing::info!(
                flow = kind.label(),
                errors = field_errors.len(),
                "Submission refused by validation"
            );
            notify_invalid(self.gateway.as_ref(), &field_errors);
            return SubmissionResult::ValidationFailure { field_errors };
        }

        tracing::info!(flow = kind.label(), "Submitting");
        let outcome = {
            let _busy = BusyGuard::show(self.gateway.as_ref(), form.busy_control());
            self.call_remote(&form.request()).await
        };

        match outcome {
            Ok(granted) => self.on_success(form, granted).await,
            Err(failure) => {
                let reason = failure.to_string();
                tracing::info!(flow = kind.label(), %reason, "Submission failed remotely");
                self.gateway.notify(&reason, Severity::Error);
                SubmissionResult::SimulatedRemoteFailure { reason }
            }
        }
    }

    /// Bounded retries over transient failures; every attempt is timed out
    async fn call_remote(&self, request: &SubmitRequest) -> Result<Granted, RemoteFailure> {
        let attempts = self.policy.remote_retries + 1;
        let mut attempt = 1;
        loop {
            let call = self.authority.authenticate(request);
            let result = match tokio::time::timeout(self.policy.remote_timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(RemoteFailure::Unavailable("request timed out".to_string())),
            };

            match result {
                Err(failure) if failure.is_transient() && attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        attempts,
                        "Transient remote failure, retrying: {failure}"
                    );
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn on_success<F: Submission>(&self, form: &F, granted: Granted) -> SubmissionResult {
        let kind = form.kind();
        self.gateway.play_cue(Cue::Success);

        if let Some(record) = form.record(Utc::now()) {
            self.persist(record).await;
        }

        let message = match kind {
            FlowKind::Login => format!(
                "Welcome back, {}. Redirecting to dashboard...",
                granted.display_name
            ),
            FlowKind::Signup => {
                format!("Access granted. Welcome aboard, {}.", granted.display_name)
            }
        };
        self.gateway.notify(&message, Severity::Success);

        tokio::time::sleep(self.policy.redirect_delay).await;
        let target = self.policy.redirect_for(kind).to_string();
        self.gateway.redirect(&target);
        tracing::info!(flow = kind.label(), %target, "Submission succeeded");

        SubmissionResult::Success {
            redirect_target: target,
        }
    }

    /// Best-effort write; failures are logged and swallowed
    async fn persist(&self, record: UserRecord) {
        let value = match serde_json::to_value(&record) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to encode user record: {e}");
                return;
            }
        };
        if let Err(e) = self.store.put(&self.policy.storage_key, value).await {
            tracing::warn!("Failed to persist user record: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoAccount;
    use crate::error::StorageError;
    use crate::gateway::{drain, ChannelGateway, PresentationEvent};
    use crate::storage::{MemoryStore, MockKeyValueStore};
    use crate::submit::remote::{MockRemoteAuthority, SimulatedAuthority};
    use tokio::sync::mpsc::UnboundedReceiver;

    const DEMO_EMAIL: &str = "operator@nexus.io";
    const DEMO_PASSWORD: &str = "Quantum#Access2077";

    fn simulated() -> Arc<SimulatedAuthority> {
        Arc::new(SimulatedAuthority::new(
            vec![DemoAccount {
                email: DEMO_EMAIL.to_string(),
                password: DEMO_PASSWORD.to_string(),
                display_name: "Operator".to_string(),
            }],
            Duration::from_millis(2000),
        ))
    }

    fn orchestrator(
        authority: Arc<dyn RemoteAuthority>,
        store: Arc<dyn KeyValueStore>,
        policy: SubmitPolicy,
    ) -> (SubmissionOrchestrator, UnboundedReceiver<PresentationEvent>) {
        let (gateway, rx) = ChannelGateway::new();
        (
            SubmissionOrchestrator::new(authority, store, Arc::new(gateway), policy),
            rx,
        )
    }

    fn complete_signup() -> SignupForm {
        let mut form = SignupForm::new();
        form.first_name.set_text("Ada");
        form.last_name.set_text("Lovelace");
        form.username.set_text("countess");
        form.email.set_text("ada@engine.io");
        form.password.set_text("Analytical#Engine1843");
        form.confirm_password.set_text("Analytical#Engine1843");
        form.terms.set_checked(true);
        form
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_collects_every_error() {
            let mut form = LoginForm::new();
            form.password.set_text("short");

            let errors = validate_fields(form.fields(), 8);
            assert_eq!(
                errors,
                vec![
                    FieldError::new("email", FieldErrorKind::Required),
                    FieldError::new("password", FieldErrorKind::TooShort { min: 8 }),
                ]
            );
        }

        #[test]
        fn test_blank_field_gets_one_error() {
            let mut form = LoginForm::new();
            form.email.set_text("   ");
            form.password.set_text("long enough");

            let errors = validate_fields(form.fields(), 8);
            assert_eq!(errors, vec![FieldError::new("email", FieldErrorKind::Required)]);
        }

        #[test]
        fn test_invalid_email() {
            let mut form = LoginForm::new();
            form.email.set_text("not-an-email");
            form.password.set_text("long enough");

            let errors = validate_fields(form.fields(), 8);
            assert_eq!(
                errors,
                vec![FieldError::new("email", FieldErrorKind::InvalidEmail)]
            );
        }

        #[test]
        fn test_optional_blank_field_is_fine() {
            let nickname = FormField::text("nickname", "Nickname").optional();
            assert!(validate_fields([&nickname], 8).is_empty());
        }

        #[test]
        fn test_unchecked_terms_and_mismatch() {
            let mut form = complete_signup();
            form.terms.set_checked(false);
            form.confirm_password.set_text("Analytical#Engine1844");

            let (orchestrator, _rx) = orchestrator(
                simulated(),
                Arc::new(MemoryStore::new()),
                SubmitPolicy::default(),
            );
            assert_eq!(
                orchestrator.validate(&form),
                vec![
                    FieldError::new("terms", FieldErrorKind::Required),
                    FieldError::new("confirm_password", FieldErrorKind::Mismatch),
                ]
            );
        }

        #[test]
        fn test_complete_signup_is_valid() {
            let (orchestrator, _rx) = orchestrator(
                simulated(),
                Arc::new(MemoryStore::new()),
                SubmitPolicy::default(),
            );
            assert!(orchestrator.validate(&complete_signup()).is_empty());
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test(start_paused = true)]
        async fn test_validation_failure_skips_remote_call() {
            let mut authority = MockRemoteAuthority::new();
            authority.expect_authenticate().times(0);

            let (orchestrator, mut rx) = orchestrator(
                Arc::new(authority),
                Arc::new(MemoryStore::new()),
                SubmitPolicy::default(),
            );
            let mut form = LoginForm::new();
            form.password.set_text("short");

            let result = orchestrator.submit(&form).await;
            assert_eq!(
                result,
                SubmissionResult::ValidationFailure {
                    field_errors: vec![
                        FieldError::new("email", FieldErrorKind::Required),
                        FieldError::new("password", FieldErrorKind::TooShort { min: 8 }),
                    ]
                }
            );
            assert_eq!(
                drain(&mut rx),
                vec![
                    PresentationEvent::Notify {
                        message: INVALID_FORM_MESSAGE.to_string(),
                        severity: Severity::Error
                    },
                    PresentationEvent::Notify {
                        message: "Password must be at least 8 characters.".to_string(),
                        severity: Severity::Error
                    },
                ]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_format_errors_are_announced_once_each() {
            let (orchestrator, mut rx) = orchestrator(
                simulated(),
                Arc::new(MemoryStore::new()),
                SubmitPolicy::default(),
            );
            let mut form = complete_signup();
            form.email.set_text("ada@engine");
            form.password.set_text("short");
            form.confirm_password.set_text("short");

            let result = orchestrator.submit(&form).await;
            assert_eq!(result.field_errors().len(), 3);

            let messages: Vec<String> = drain(&mut rx)
                .into_iter()
                .filter_map(|event| match event {
                    PresentationEvent::Notify { message, .. } => Some(message),
                    _ => None,
                })
                .collect();
            assert_eq!(
                messages,
                vec![
                    INVALID_FORM_MESSAGE.to_string(),
                    "Please enter a valid email address.".to_string(),
                    "Password must be at least 8 characters.".to_string(),
                ]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_signup_success_writes_record() {
            let store = Arc::new(MemoryStore::new());
            let (orchestrator, mut rx) =
                orchestrator(simulated(), store.clone(), SubmitPolicy::default());

            let start = tokio::time::Instant::now();
            let result = orchestrator.submit(&complete_signup()).await;
            assert!(start.elapsed() >= Duration::from_millis(2000));

            assert_eq!(
                result,
                SubmissionResult::Success {
                    redirect_target: "index.html".to_string()
                }
            );

            let stored = store.get("quantum_user").await.unwrap().unwrap();
            let record: UserRecord = serde_json::from_value(stored).unwrap();
            assert_eq!(record.first_name, "Ada");
            assert_eq!(record.last_name, "Lovelace");
            assert_eq!(record.email, "ada@engine.io");

            let events = drain(&mut rx);
            assert_eq!(
                events.first(),
                Some(&PresentationEvent::ShowBusy {
                    control: BusyControl::SignupButton
                })
            );
            assert_eq!(
                events[1],
                PresentationEvent::ClearBusy {
                    control: BusyControl::SignupButton
                }
            );
            assert!(events.contains(&PresentationEvent::PlayCue { cue: Cue::Success }));
            assert_eq!(
                events.last(),
                Some(&PresentationEvent::Redirect {
                    target: "index.html".to_string()
                })
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_login_success_redirects_to_dashboard() {
            let store = Arc::new(MemoryStore::new());
            let (orchestrator, mut rx) =
                orchestrator(simulated(), store.clone(), SubmitPolicy::default());
            let mut form = LoginForm::new();
            form.email.set_text(DEMO_EMAIL);
            form.password.set_text(DEMO_PASSWORD);

            let result = orchestrator.submit(&form).await;
            assert_eq!(
                result,
                SubmissionResult::Success {
                    redirect_target: "dashboard.html".to_string()
                }
            );
            // Only signups are persisted
            assert!(store.is_empty().await);
            assert!(drain(&mut rx).contains(&PresentationEvent::Notify {
                message: "Welcome back, Operator. Redirecting to dashboard...".to_string(),
                severity: Severity::Success,
            }));
        }

        #[tokio::test(start_paused = true)]
        async fn test_remote_failure_clears_busy_and_notifies() {
            let (orchestrator, mut rx) = orchestrator(
                simulated(),
                Arc::new(MemoryStore::new()),
                SubmitPolicy::default(),
            );
            let mut form = LoginForm::new();
            form.email.set_text(DEMO_EMAIL);
            form.password.set_text("wrong password");

            let result = orchestrator.submit(&form).await;
            assert_eq!(
                result,
                SubmissionResult::SimulatedRemoteFailure {
                    reason: "Invalid credentials. Access denied.".to_string()
                }
            );
            assert_eq!(
                drain(&mut rx),
                vec![
                    PresentationEvent::ShowBusy {
                        control: BusyControl::LoginButton
                    },
                    PresentationEvent::ClearBusy {
                        control: BusyControl::LoginButton
                    },
                    PresentationEvent::Notify {
                        message: "Invalid credentials. Access denied.".to_string(),
                        severity: Severity::Error
                    },
                ]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_transient_failure_is_retried() {
            let authority = Arc::new(
                SimulatedAuthority::new(
                    vec![DemoAccount {
                        email: DEMO_EMAIL.to_string(),
                        password: DEMO_PASSWORD.to_string(),
                        display_name: "Operator".to_string(),
                    }],
                    Duration::from_millis(100),
                )
                .with_faults([RemoteFailure::Unavailable("blip".to_string())]),
            );
            let policy = SubmitPolicy {
                remote_retries: 1,
                ..SubmitPolicy::default()
            };
            let (orchestrator, _rx) =
                orchestrator(authority, Arc::new(MemoryStore::new()), policy);
            let mut form = LoginForm::new();
            form.email.set_text(DEMO_EMAIL);
            form.password.set_text(DEMO_PASSWORD);

            assert!(orchestrator.submit(&form).await.is_success());
        }

        #[tokio::test(start_paused = true)]
        async fn test_rejection_is_not_retried() {
            let mut authority = MockRemoteAuthority::new();
            authority
                .expect_authenticate()
                .times(1)
                .returning(|_| Err(RemoteFailure::Rejected("nope".to_string())));
            let policy = SubmitPolicy {
                remote_retries: 3,
                ..SubmitPolicy::default()
            };
            let (orchestrator, _rx) =
                orchestrator(Arc::new(authority), Arc::new(MemoryStore::new()), policy);

            let result = orchestrator.submit(&complete_signup()).await;
            assert_eq!(
                result,
                SubmissionResult::SimulatedRemoteFailure {
                    reason: "nope".to_string()
                }
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_hung_authority_times_out() {
            let authority = Arc::new(SimulatedAuthority::new(vec![], Duration::from_secs(3600)));
            let policy = SubmitPolicy {
                remote_timeout: Duration::from_secs(5),
                remote_retries: 1,
                ..SubmitPolicy::default()
            };
            let (orchestrator, mut rx) =
                orchestrator(authority, Arc::new(MemoryStore::new()), policy);

            let result = orchestrator.submit(&complete_signup()).await;
            assert_eq!(
                result,
                SubmissionResult::SimulatedRemoteFailure {
                    reason: "Service unavailable: request timed out".to_string()
                }
            );
            assert!(drain(&mut rx).contains(&PresentationEvent::ClearBusy {
                control: BusyControl::SignupButton
            }));
        }

        #[tokio::test(start_paused = true)]
        async fn test_storage_failure_is_swallowed() {
            let mut store = MockKeyValueStore::new();
            store
                .expect_put()
                .times(1)
                .returning(|_, _| Err(StorageError::Unavailable("quota exceeded".to_string())));
            let (orchestrator, _rx) =
                orchestrator(simulated(), Arc::new(store), SubmitPolicy::default());

            assert!(orchestrator.submit(&complete_signup()).await.is_success());
        }

        #[tokio::test(start_paused = true)]
        async fn test_dropped_submit_still_clears_busy() {
            let (orchestrator, mut rx) = orchestrator(
                simulated(),
                Arc::new(MemoryStore::new()),
                SubmitPolicy::default(),
            );
            let form = complete_signup();

            let result =
                tokio::time::timeout(Duration::from_millis(100), orchestrator.submit(&form)).await;
            assert!(result.is_err());
            assert_eq!(
                drain(&mut rx),
                vec![
                    PresentationEvent::ShowBusy {
                        control: BusyControl::SignupButton
                    },
                    PresentationEvent::ClearBusy {
                        control: BusyControl::SignupButton
                    },
                ]
            );
        }
    }
}
