//! Profile session controller.
//!
//! Drives the profile page: the sign-in/sign-up form while signed out,
//! the profile card while viewing, and the draft plus skill picker while
//! editing.
//!
//! ```text
//!                  sign_in / sign_up
//! Unauthenticated ------------------> Viewing <----------+
//!        ^                              |                |
//!        |                   begin_edit |                | save (ok) / cancel_edit
//!        |                              v                |
//!        +-------- sign_out ------- Editing -------------+
//! ```
//!
//! Every failure, local or remote, is returned to the caller and also kept
//! in `error()` until the next successful operation. Filling in the sign-in
//! form does not clear it.

use std::fmt;
use std::str::FromStr;

use teamfinder_core::error::{Result, TeamfinderError};
use teamfinder_core::gateway::{AuthGateway, Identity, RecordStore};
use teamfinder_core::profile::{DraftField, NewProfile, Profile, ProfileDraft};
use teamfinder_core::session::SessionContext;
use teamfinder_core::skill::{ProfileSkill, Skill, SkillId};

/// Which form the signed-out page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::SignIn => f.write_str("sign in"),
            AuthMode::SignUp => f.write_str("sign up"),
        }
    }
}

/// Fields of the sign-in/sign-up form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
    /// Sign-up only.
    Username,
}

impl FromStr for AuthField {
    type Err = TeamfinderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(AuthField::Email),
            "password" => Ok(AuthField::Password),
            "username" => Ok(AuthField::Username),
            other => Err(TeamfinderError::validation(format!(
                "Unknown form field '{}' (expected email, password or username)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub username: String,
}

impl AuthForm {
    pub fn set(&mut self, field: AuthField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AuthField::Email => self.email = value,
            AuthField::Password => self.password = value,
            AuthField::Username => self.username = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated { mode: AuthMode, form: AuthForm },
    Viewing,
    Editing {
        draft: ProfileDraft,
        selected_skill: Option<SkillId>,
    },
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Unauthenticated {
            mode: AuthMode::default(),
            form: AuthForm::default(),
        }
    }
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated { .. } => "unauthenticated",
            SessionState::Viewing => "viewing",
            SessionState::Editing { .. } => "editing",
        }
    }
}

pub struct ProfileSessionController {
    store: RecordStore,
    session: SessionContext,
    state: SessionState,
    loading: bool,
    profile: Option<Profile>,
    skills: Vec<Skill>,
    catalog: Vec<Skill>,
    error: Option<TeamfinderError>,
}

impl ProfileSessionController {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            session: SessionContext::new(),
            state: SessionState::default(),
            loading: true,
            profile: None,
            skills: Vec::new(),
            catalog: Vec::new(),
            error: None,
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// True from construction until the first identity check completes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// The signed-in user's skills, without duplicate ids.
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn catalog(&self) -> &[Skill] {
        &self.catalog
    }

    /// Catalog skills the user does not hold yet.
    pub fn addable_skills(&self) -> Vec<&Skill> {
        self.catalog
            .iter()
            .filter(|skill| !self.skills.iter().any(|own| own.id == skill.id))
            .collect()
    }

    pub fn error(&self) -> Option<&TeamfinderError> {
        self.error.as_ref()
    }

    pub fn mode(&self) -> Option<AuthMode> {
        match &self.state {
            SessionState::Unauthenticated { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&AuthForm> {
        match &self.state {
            SessionState::Unauthenticated { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&ProfileDraft> {
        match &self.state {
            SessionState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn selected_skill(&self) -> Option<&str> {
        match &self.state {
            SessionState::Editing { selected_skill, .. } => selected_skill.as_deref(),
            _ => None,
        }
    }

    // ============================================================================
    // Mount
    // ============================================================================

    /// Checks the current identity and, when signed in, loads the profile,
    /// the catalog and the user's skills.
    pub async fn init(&mut self) -> Result<()> {
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let result = self.load_session().await;
        self.loading = false;
        self.record(result)
    }

    async fn load_session(&mut self) -> Result<()> {
        let gateway = self.store.gateway().clone();
        let current = self
            .session
            .init(&*gateway)
            .await
            .map(|found| found.cloned());
        let identity = match current {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                self.reset_signed_out();
                return Ok(());
            }
            Err(e) => {
                self.reset_signed_out();
                return Err(e);
            }
        };

        let loaded = tokio::try_join!(
            self.store.get_profile(&identity.id),
            self.store.list_skills(),
            self.store.list_profile_skills(&identity.id),
        );
        match loaded {
            Ok((profile, catalog, skills)) => {
                tracing::info!(user_id = %identity.id, skills = skills.len(), "Profile loaded");
                self.profile = Some(profile);
                self.catalog = catalog;
                self.skills = skills;
                self.state = SessionState::Viewing;
                Ok(())
            }
            Err(e) => {
                self.reset_signed_out();
                Err(e)
            }
        }
    }

    // ============================================================================
    // Signed out
    // ============================================================================

    /// Switches between the sign-in and sign-up forms, clearing the form
    /// and any shown error.
    pub fn toggle_mode(&mut self) {
        if let SessionState::Unauthenticated { mode, form } = &mut self.state {
            *mode = mode.toggled();
            *form = AuthForm::default();
            self.error = None;
        }
    }

    /// Fills one form field. A shown error stays until the next submit or
    /// mode switch.
    pub fn set_form_field(&mut self, field: AuthField, value: impl Into<String>) -> Result<()> {
        if let SessionState::Unauthenticated { form, .. } = &mut self.state {
            form.set(field, value);
            return Ok(());
        }
        self.record(Err(TeamfinderError::invalid_state("Already signed in")))
    }

    /// Submits the form according to the current mode.
    pub async fn submit(&mut self) -> Result<()> {
        let (mode, form) = match &self.state {
            SessionState::Unauthenticated { mode, form } => (*mode, form.clone()),
            _ => {
                return self.record(Err(TeamfinderError::invalid_state("Already signed in")));
            }
        };
        match mode {
            AuthMode::SignIn => self.sign_in(&form.email, &form.password).await,
            AuthMode::SignUp => {
                self.sign_up(&form.email, &form.password, &form.username)
                    .await
            }
        }
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<()> {
        let result = self.try_sign_in(email, password).await;
        self.record(result)
    }

    async fn try_sign_in(&mut self, email: &str, password: &str) -> Result<()> {
        self.require_signed_out()?;
        let email = require_credentials(email, password)?;

        let session = self.store.gateway().sign_in(email, password).await?;
        self.session.set(session.user);
        self.load_session().await
    }

    /// Creates the identity, then its profile row, then loads the session.
    ///
    /// A failed profile insert is reported but the identity stays created.
    pub async fn sign_up(&mut self, email: &str, password: &str, username: &str) -> Result<()> {
        let result = self.try_sign_up(email, password, username).await;
        self.record(result)
    }

    async fn try_sign_up(&mut self, email: &str, password: &str, username: &str) -> Result<()> {
        self.require_signed_out()?;
        let username = username.trim();
        if username.is_empty() {
            return Err(TeamfinderError::validation("Username is required"));
        }
        let email = require_credentials(email, password)?;

        let identity = self.store.gateway().sign_up(email, password).await?;
        let row = NewProfile {
            id: identity.id.clone(),
            username: username.to_string(),
            email: email.to_string(),
        };
        if let Err(e) = self.store.create_profile(&row).await {
            tracing::warn!(user_id = %identity.id, error = %e, "Profile insert failed after sign-up");
            return Err(e);
        }

        self.session.set(identity);
        self.load_session().await
    }

    // ============================================================================
    // Signed in
    // ============================================================================

    /// Starts editing with a draft copied from the profile.
    pub fn begin_edit(&mut self) -> Result<()> {
        let draft = match (&self.state, &self.profile) {
            (SessionState::Viewing, Some(profile)) => Ok(Some(ProfileDraft::from_profile(profile))),
            (SessionState::Editing { .. }, _) => Ok(None),
            _ => Err(TeamfinderError::invalid_state("No profile to edit")),
        };
        let result = draft.map(|draft| {
            if let Some(draft) = draft {
                self.state = SessionState::Editing {
                    draft,
                    selected_skill: None,
                };
            }
        });
        self.record(result)
    }

    pub fn set_draft_field(&mut self, field: DraftField, value: impl Into<String>) -> Result<()> {
        let result = match &mut self.state {
            SessionState::Editing { draft, .. } => {
                draft.set(field, value);
                Ok(())
            }
            _ => Err(not_editing()),
        };
        self.record(result)
    }

    /// Writes the whole draft to the profile row.
    ///
    /// On failure the controller stays in editing with the draft untouched.
    pub async fn save(&mut self) -> Result<()> {
        let result = self.try_save().await;
        self.record(result)
    }

    async fn try_save(&mut self) -> Result<()> {
        let draft = match &self.state {
            SessionState::Editing { draft, .. } => draft.clone(),
            _ => return Err(not_editing()),
        };
        draft.validate()?;
        let id = self.session.require()?.id.clone();

        self.store.update_profile(&id, &draft).await?;

        if let Some(profile) = &self.profile {
            self.profile = Some(draft.apply_to(profile));
        }
        self.state = SessionState::Viewing;
        tracing::info!(user_id = %id, "Profile saved");
        Ok(())
    }

    /// Leaves editing, discarding the draft.
    pub fn cancel_edit(&mut self) -> Result<()> {
        let result = match self.state {
            SessionState::Editing { .. } => {
                self.state = SessionState::Viewing;
                Ok(())
            }
            _ => Err(not_editing()),
        };
        self.record(result)
    }

    /// Sets (or clears) the skill the next `add_skill` adds.
    pub fn select_skill(&mut self, skill_id: Option<&str>) -> Result<()> {
        let known = skill_id.is_none_or(|id| self.catalog.iter().any(|s| s.id == id));
        let result = match &mut self.state {
            SessionState::Editing { .. } if !known => Err(TeamfinderError::validation(format!(
                "Unknown skill '{}'",
                skill_id.unwrap_or_default()
            ))),
            SessionState::Editing { selected_skill, .. } => {
                *selected_skill = skill_id.map(str::to_string);
                Ok(())
            }
            _ => Err(not_editing()),
        };
        self.record(result)
    }

    /// Associates the selected skill with the profile.
    ///
    /// Without a selection this does nothing. On success the skill is
    /// appended locally (once) and the selection cleared.
    pub async fn add_skill(&mut self) -> Result<()> {
        let result = self.try_add_skill().await;
        self.record(result)
    }

    async fn try_add_skill(&mut self) -> Result<()> {
        let skill_id = match &self.state {
            SessionState::Editing {
                selected_skill: Some(id),
                ..
            } => id.clone(),
            SessionState::Editing { .. } => return Ok(()),
            _ => return Err(not_editing()),
        };
        let profile_id = self.session.require()?.id.clone();

        self.store
            .add_profile_skill(&ProfileSkill::new(profile_id, skill_id.as_str()))
            .await?;

        let already_held = self.skills.iter().any(|skill| skill.id == skill_id);
        if !already_held {
            if let Some(skill) = self.catalog.iter().find(|skill| skill.id == skill_id) {
                self.skills.push(skill.clone());
            }
        }
        if let SessionState::Editing { selected_skill, .. } = &mut self.state {
            *selected_skill = None;
        }
        tracing::debug!(skill_id = %skill_id, "Skill added");
        Ok(())
    }

    /// Removes the association; the local list drops the skill on success.
    pub async fn remove_skill(&mut self, skill_id: &str) -> Result<()> {
        let result = self.try_remove_skill(skill_id).await;
        self.record(result)
    }

    async fn try_remove_skill(&mut self, skill_id: &str) -> Result<()> {
        if !matches!(self.state, SessionState::Editing { .. }) {
            return Err(not_editing());
        }
        let profile_id = self.session.require()?.id.clone();

        self.store
            .remove_profile_skill(&ProfileSkill::new(profile_id, skill_id))
            .await?;

        self.skills.retain(|skill| skill.id != skill_id);
        tracing::debug!(skill_id, "Skill removed");
        Ok(())
    }

    /// Signs out on the gateway and clears all local session data.
    ///
    /// Local data is cleared even when the gateway call fails.
    pub async fn sign_out(&mut self) -> Result<()> {
        let gateway = self.store.gateway().clone();
        let result = self.session.teardown(&*gateway).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Gateway sign-out failed");
        }
        self.reset_signed_out();
        self.record(result)
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    fn reset_signed_out(&mut self) {
        self.session.clear();
        self.profile = None;
        self.skills.clear();
        self.state = SessionState::default();
    }

    fn require_signed_out(&self) -> Result<()> {
        match self.state {
            SessionState::Unauthenticated { .. } => Ok(()),
            _ => Err(TeamfinderError::invalid_state("Already signed in")),
        }
    }

    /// Keeps the outcome for display and passes it through.
    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.error = None,
            Err(e) => {
                tracing::warn!(state = self.state.name(), error = %e, "Profile operation failed");
                self.error = Some(e.clone());
            }
        }
        result
    }
}

fn not_editing() -> TeamfinderError {
    TeamfinderError::invalid_state("Not editing")
}

/// Trimmed email, once both credentials are present.
fn require_credentials<'a>(email: &'a str, password: &str) -> Result<&'a str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(TeamfinderError::validation("Email and password are required"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_mode_toggles() {
        assert_eq!(AuthMode::SignIn.toggled(), AuthMode::SignUp);
        assert_eq!(AuthMode::SignUp.toggled().to_string(), "sign in");
    }

    #[test]
    fn test_auth_field_parsing() {
        assert_eq!("Email".parse::<AuthField>().unwrap(), AuthField::Email);
        assert!("phone".parse::<AuthField>().unwrap_err().is_validation());
    }

    #[test]
    fn test_require_credentials() {
        assert_eq!(require_credentials(" ada@example.com ", "pw").unwrap(), "ada@example.com");
        let err = require_credentials("", "pw").unwrap_err();
        assert_eq!(err.user_message(), "Email and password are required");
    }
}
