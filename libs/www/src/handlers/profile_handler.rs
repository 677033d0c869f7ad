use std::{collections::HashMap, sync::Arc};

use log::{error, info, warn};
use persistance::users::User;
use thiserror::Error;
use warp::{
    filters::BoxedFilter,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        Response, StatusCode,
    },
    reply, Filter, Reply,
};

use super::{filters::with_state, message_page};
use crate::AppState;

/// Export the user as a vCard.
pub const MODE_VCARD: u8 = 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProfileError {
    #[error("invalid value for parameter {0}")]
    InvalidParameter(&'static str),
    #[error("no user with id {0}")]
    RecordNotFound(u32),
}

#[derive(Debug, PartialEq, Eq)]
pub struct ProfileRequest {
    pub user_id: u32,
    pub mode: u8,
}

impl ProfileRequest {
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, ProfileError> {
        let user_id = params
            .get("user_id")
            .and_then(|id| id.trim().parse::<u32>().ok())
            .filter(|id| *id > 0)
            .ok_or(ProfileError::InvalidParameter("user_id"))?;
        let mode = params
            .get("mode")
            .and_then(|mode| mode.trim().parse::<u8>().ok())
            .filter(|mode| *mode == MODE_VCARD)
            .ok_or(ProfileError::InvalidParameter("mode"))?;
        Ok(Self { user_id, mode })
    }
}

/// `<first> <last>.vcf`, without characters that would end the quoted
/// header parameter.
pub fn vcard_filename(user: &User) -> String {
    format!("{}.vcf", user.full_name())
        .chars()
        .filter(|c| !matches!(c, '"' | '\\') && !c.is_control())
        .collect()
}

struct Runner {}

impl Runner {
    pub fn lookup(state: &AppState, request: &ProfileRequest) -> Result<User, ProfileError> {
        state
            .users
            .get(request.user_id)
            .cloned()
            .ok_or(ProfileError::RecordNotFound(request.user_id))
    }

    pub fn vcard(user: &User) -> reply::Response {
        let disposition = format!("attachment; filename=\"{}\"", vcard_filename(user));
        match Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "text/x-vcard")
            .header(CONTENT_DISPOSITION, disposition)
            .body(user.vcard())
        {
            Ok(response) => response.into_response(),
            Err(e) => {
                error!("could not build vcard response for user {}: {}", user.id, e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }

    pub fn profile_function(state: &AppState, params: HashMap<String, String>) -> reply::Response {
        let result = ProfileRequest::parse(&params).and_then(|request| {
            let user = Self::lookup(state, &request)?;
            Ok((request, user))
        });
        match result {
            Ok((request, user)) if request.mode == MODE_VCARD => {
                info!("exporting vcard of user {}", user.id);
                Self::vcard(&user)
            }
            Ok(_) => Self::error(state, ProfileError::InvalidParameter("mode")),
            Err(e) => Self::error(state, e),
        }
    }

    fn error(state: &AppState, e: ProfileError) -> reply::Response {
        warn!("profile function rejected: {}", e);
        match e {
            ProfileError::InvalidParameter(_) => message_page(
                state,
                "Note",
                "Invalid page call!",
                StatusCode::BAD_REQUEST,
            ),
            ProfileError::RecordNotFound(_) => message_page(
                state,
                "Note",
                "The requested user does not exist.",
                StatusCode::NOT_FOUND,
            ),
        }
    }
}

pub struct ProfileRouter {
    state: Arc<AppState>,
}

impl ProfileRouter {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn routes(&self) -> BoxedFilter<(impl Reply,)> {
        self.profile_function()
    }

    fn profile_function(&self) -> BoxedFilter<(impl Reply,)> {
        warp::get()
            .and(warp::path!("profile" / "profile_function"))
            .and(warp::query::<HashMap<String, String>>())
            .and(with_state(self.state.clone()))
            .map(|params: HashMap<String, String>, state: Arc<AppState>| {
                Runner::profile_function(&state, params)
            })
            .boxed()
    }
}
