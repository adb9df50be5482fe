//! User operations

use common::KeyValueStore;
use tracing::info;

use crate::error::{ShopError, ShopResult};
use crate::models::{Profile, ProfileUpdate, Registration, Role, User, UserId};
use crate::store::{Store, next_id};

impl<S: KeyValueStore> Store<S> {
    pub fn find_user(&self, user_id: UserId) -> Option<&User> {
        self.document().user(user_id)
    }

    /// Case-insensitive username lookup
    pub fn find_user_by_name(&self, username: &str) -> Option<&User> {
        self.document().user_by_name(username.trim())
    }

    pub fn list_users(&self) -> &[User] {
        &self.document().users
    }

    /// Create a user from a registration. Does not touch the session.
    pub(crate) fn create_user(&mut self, registration: Registration) -> ShopResult<User> {
        self.mutate(|doc| {
            let username = registration.username.trim().to_string();
            if username.is_empty() {
                return Err(ShopError::MissingField("username"));
            }
            if doc.user_by_name(&username).is_some() {
                return Err(ShopError::Conflict(format!("username {username} is taken")));
            }

            let profile = match registration.role {
                Role::User => Profile::User { orders: Vec::new() },
                Role::Company => {
                    let company_name = match registration.company_name.trim() {
                        "" => username.clone(),
                        name => name.to_string(),
                    };
                    Profile::Company {
                        company_name,
                        desc: String::new(),
                    }
                }
            };
            let user = User {
                id: UserId::new(next_id(doc)?),
                username,
                email: registration.email.trim().to_string(),
                phone: registration.phone.trim().to_string(),
                profile,
            };
            doc.users.push(user.clone());
            info!("Created {} {} ({})", user.role(), user.id, user.username);
            Ok(user)
        })
    }

    /// Edit a user's contact details and display name.
    ///
    /// For buyers `name` becomes the username and must stay unique; for
    /// companies it becomes the company name and `desc` is stored too.
    pub fn update_profile(&mut self, user_id: UserId, update: ProfileUpdate) -> ShopResult<User> {
        self.mutate(|doc| {
            let name = update.name.trim().to_string();
            let role = doc
                .user(user_id)
                .map(User::role)
                .ok_or_else(|| ShopError::NotFound(format!("user {user_id}")))?;

            if role == Role::User {
                if name.is_empty() {
                    return Err(ShopError::MissingField("username"));
                }
                let taken = doc
                    .users
                    .iter()
                    .any(|u| u.id != user_id && u.has_username(&name));
                if taken {
                    return Err(ShopError::Conflict(format!("username {name} is taken")));
                }
            }

            let Some(user) = doc.user_mut(user_id) else {
                return Err(ShopError::NotFound(format!("user {user_id}")));
            };
            match &mut user.profile {
                Profile::User { .. } => user.username = name,
                Profile::Company { company_name, desc } => {
                    *company_name = name;
                    *desc = update.desc.trim().to_string();
                }
            }
            user.email = update.email.trim().to_string();
            user.phone = update.phone.trim().to_string();

            info!("Updated profile of user {}", user_id);
            Ok(user.clone())
        })
    }
}
