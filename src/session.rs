//! Typed access to the principal fields kept in the actix session.
//!
//! [`SessionData`] mirrors the raw shape: five independently optional fields, read and
//! written without cross-field checks so records produced elsewhere always load.
//! [`Principal`] is the checked view: at most one principal id, agreeing with the role tag.

use actix_session::Session;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const SESSION_ADMIN_ID_KEY: &str = "adminId";
pub const SESSION_INFLUENCER_ID_KEY: &str = "influencerId";
pub const SESSION_USER_ID_KEY: &str = "userId";
pub const SESSION_USER_ROLE_KEY: &str = "userRole";
pub const SESSION_ID_KEY: &str = "sessionId";

const SESSION_ID_LENGTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Influencer,
    Buyer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub admin_id: Option<String>,
    pub influencer_id: Option<String>,
    pub user_id: Option<String>,
    pub user_role: Option<UserRole>,
    pub session_id: Option<String>,
}

impl SessionData {
    /// Read every field; missing keys come back as `None`.
    pub fn read(session: &Session) -> Result<Self, Error> {
        Ok(SessionData {
            admin_id: session.get(SESSION_ADMIN_ID_KEY)?,
            influencer_id: session.get(SESSION_INFLUENCER_ID_KEY)?,
            user_id: session.get(SESSION_USER_ID_KEY)?,
            user_role: session.get(SESSION_USER_ROLE_KEY)?,
            session_id: session.get(SESSION_ID_KEY)?,
        })
    }

    /// Insert every `Some` field and remove every `None` field.
    pub fn write(&self, session: &Session) -> Result<(), Error> {
        put(session, SESSION_ADMIN_ID_KEY, self.admin_id.as_ref())?;
        put(session, SESSION_INFLUENCER_ID_KEY, self.influencer_id.as_ref())?;
        put(session, SESSION_USER_ID_KEY, self.user_id.as_ref())?;
        put(session, SESSION_USER_ROLE_KEY, self.user_role.as_ref())?;
        put(session, SESSION_ID_KEY, self.session_id.as_ref())?;

        Ok(())
    }
}

fn put<T: Serialize>(session: &Session, key: &str, value: Option<&T>) -> Result<(), Error> {
    match value {
        Some(value) => session.insert(key, value)?,
        None => {
            session.remove(key);
        }
    }

    Ok(())
}

/// Random alphanumeric token used as the `sessionId` tag.
pub fn generate_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// The actor behind the current request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Principal {
    Admin(String),
    Influencer(String),
    Buyer(String),
    Anonymous,
}

impl Principal {
    pub fn role(&self) -> Option<UserRole> {
        match self {
            Principal::Admin(_) => Some(UserRole::Admin),
            Principal::Influencer(_) => Some(UserRole::Influencer),
            Principal::Buyer(_) => Some(UserRole::Buyer),
            Principal::Anonymous => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Principal::Admin(id) | Principal::Influencer(id) | Principal::Buyer(id) => Some(id),
            Principal::Anonymous => None,
        }
    }

    /// Resolve the raw fields into a single principal.
    ///
    /// A missing role tag is inferred from the one id present. Several ids, a role
    /// without its id, or a role that disagrees with the id are rejected.
    pub fn from_session_data(data: &SessionData) -> Result<Self, Error> {
        let ids = [
            (UserRole::Admin, &data.admin_id),
            (UserRole::Influencer, &data.influencer_id),
            (UserRole::Buyer, &data.user_id),
        ];

        let mut present = ids
            .into_iter()
            .filter_map(|(role, id)| id.clone().map(|id| (role, id)));

        let found = present.next();
        if present.next().is_some() {
            return Err(Error::InconsistentSession(
                "more than one principal id is set".to_string(),
            ));
        }

        match (found, data.user_role) {
            (None, None) => Ok(Principal::Anonymous),
            (None, Some(tag)) => Err(Error::InconsistentSession(format!(
                "role {:?} is set without a matching id",
                tag
            ))),
            (Some((role, _)), Some(tag)) if tag != role => {
                Err(Error::InconsistentSession(format!(
                    "role {:?} does not match the {:?} id that is set",
                    tag, role
                )))
            }
            (Some((role, id)), _) => Ok(Principal::with_role(role, id)),
        }
    }

    pub fn read(session: &Session) -> Result<Self, Error> {
        Self::from_session_data(&SessionData::read(session)?)
    }

    /// Record this principal, clearing any other principal id. A fresh `sessionId`
    /// is assigned when the session has none.
    pub fn store(&self, session: &Session) -> Result<(), Error> {
        let mut data = SessionData::read(session)?;

        data.admin_id = None;
        data.influencer_id = None;
        data.user_id = None;
        data.user_role = self.role();

        match self {
            Principal::Admin(id) => data.admin_id = Some(id.clone()),
            Principal::Influencer(id) => data.influencer_id = Some(id.clone()),
            Principal::Buyer(id) => data.user_id = Some(id.clone()),
            Principal::Anonymous => {}
        }

        if data.session_id.is_none() && *self != Principal::Anonymous {
            data.session_id = Some(generate_session_id());
        }

        log::debug!("Storing session principal {:?}", self.role());
        data.write(session)
    }

    fn with_role(role: UserRole, id: String) -> Self {
        match role {
            UserRole::Admin => Principal::Admin(id),
            UserRole::Influencer => Principal::Influencer(id),
            UserRole::Buyer => Principal::Buyer(id),
        }
    }
}
