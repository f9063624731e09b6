use anyhow::anyhow;
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::form::{FormData, UploadFilePayload};
use crate::dtos::user_dtos::UserDto;
use crate::entities::user::DEFAULT_PROFILE_PICTURE;
use crate::entities::{NewUser, User};
use crate::http_error::{HttpError, HttpResult};
use crate::repositories::{DataError, UserRepository};
use crate::services::validation::{FormValidator, NOT_UNIQUE};
use crate::services::{ImageService, MediaStorage, PasswordService};

const USERNAME_MAX_LENGTH: usize = 150;
const NAME_MAX_LENGTH: usize = 150;
const PASSWORD_MIN_LENGTH: usize = 8;
const ADULT_AGE_DAYS: i64 = 18 * 365;
const PROFILE_PICTURE_PREFIX: &str = "users";

const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "12345678", "123456789", "qwerty123", "iloveyou", "11111111",
    "abc12345", "letmein1", "sunshine",
];

pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: PasswordService,
    media: MediaStorage,
    images: ImageService,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: PasswordService,
        media: MediaStorage,
        images: ImageService,
    ) -> Self {
        Self {
            users,
            passwords,
            media,
            images,
        }
    }

    pub async fn register(&self, form: &FormData) -> HttpResult<User> {
        let mut validator = FormValidator::new(form, false);
        let username = validator.string("username", USERNAME_MAX_LENGTH, true);
        let email = validator.email("email", true);
        let password = validator.string("password", 128, true);
        let first_name = validator.string("first_name", NAME_MAX_LENGTH, false);
        let last_name = validator.string("last_name", NAME_MAX_LENGTH, false);
        let date_of_birth = validator.date("date_of_birth", true);
        let pfp = validator.image("pfp", false, &self.images);

        if let Some(username) = &username {
            self.check_username(&mut validator, username, None).await?;
        }
        if let Some(email) = &email {
            self.check_email(&mut validator, email, None).await?;
        }
        if let Some(date) = date_of_birth {
            check_adult(&mut validator, date);
        }
        if let Some(password) = &password {
            check_password(&mut validator, password, username.as_deref());
        }
        validator.finish()?;

        let (Some(username), Some(email), Some(password)) = (username, email, password) else {
            return Err(HttpError::internal("validated registration is incomplete"));
        };

        let password_hash = self.passwords.hash(&password)?;
        let stored = match pfp {
            Some(file) => Some(self.store_profile_picture(file).await?),
            None => None,
        };
        let pfp = stored
            .clone()
            .unwrap_or_else(|| DEFAULT_PROFILE_PICTURE.to_string());

        let created = self
            .users
            .create(NewUser {
                public_id: Uuid::new_v4(),
                username,
                email,
                first_name: first_name.unwrap_or_default(),
                last_name: last_name.unwrap_or_default(),
                date_of_birth,
                pfp,
                password_hash,
                is_staff: false,
            })
            .await;
        if created.is_err() {
            self.discard(stored.as_deref()).await;
        }
        let user = created.map_err(unique_error)?;

        log::info!("Registered user {} ({})", user.username, user.public_id);
        Ok(user)
    }

    pub async fn get_by_public_id(&self, public_id: Uuid) -> HttpResult<User> {
        self.users
            .get_by_public_id(public_id)
            .await?
            .ok_or_else(HttpError::not_found)
    }

    pub async fn get(&self, id: i64) -> HttpResult<User> {
        self.users.get(id).await?.ok_or_else(HttpError::not_found)
    }

    /// Partial update; only the user themselves or an admin may edit.
    pub async fn update(&self, caller: &User, public_id: Uuid, form: &FormData) -> HttpResult<User> {
        let mut user = self.get_by_public_id(public_id).await?;
        if caller.id != user.id && !caller.is_staff {
            return Err(HttpError::forbidden());
        }

        let mut validator = FormValidator::new(form, true);
        let username = validator.string("username", USERNAME_MAX_LENGTH, true);
        let email = validator.email("email", true);
        let password = validator.string("password", 128, true);
        let first_name = validator.string("first_name", NAME_MAX_LENGTH, false);
        let last_name = validator.string("last_name", NAME_MAX_LENGTH, false);
        let date_of_birth = validator.date("date_of_birth", true);
        let pfp = validator.image("pfp", false, &self.images);

        if let Some(username) = &username {
            self.check_username(&mut validator, username, Some(user.id))
                .await?;
        }
        if let Some(email) = &email {
            self.check_email(&mut validator, email, Some(user.id)).await?;
        }
        if let Some(date) = date_of_birth {
            check_adult(&mut validator, date);
        }
        if let Some(password) = &password {
            let name = username.as_deref().unwrap_or(&user.username);
            check_password(&mut validator, password, Some(name));
        }
        validator.finish()?;

        if let Some(username) = username {
            user.username = username;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(first_name) = first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            user.last_name = last_name;
        }
        if date_of_birth.is_some() {
            user.date_of_birth = date_of_birth;
        }
        if let Some(password) = password {
            user.password_hash = self.passwords.hash(&password)?;
        }
        let stored = match pfp {
            Some(file) => Some(self.store_profile_picture(file).await?),
            None => None,
        };
        if let Some(path) = &stored {
            user.pfp = path.clone();
        }

        let updated = self.users.update(&user).await;
        if updated.is_err() {
            self.discard(stored.as_deref()).await;
        }
        let updated = updated.map_err(unique_error)?;
        log::info!("Updated user {}", updated.public_id);
        Ok(updated)
    }

    pub async fn to_dto(&self, user: User) -> HttpResult<UserDto> {
        let total_experience = self.users.total_experience(user.id).await?;
        let pfp_url = self.media.url(&user.pfp);
        Ok(UserDto::new(user, pfp_url, total_experience))
    }

    /// Creates the configured admin account unless the username already exists.
    pub async fn ensure_admin(&self, username: &str, email: &str, password: &str) -> anyhow::Result<()> {
        if self
            .users
            .get_by_username(username)
            .await
            .map_err(|e| anyhow!("{}", e))?
            .is_some()
        {
            log::debug!("Admin account {} already exists", username);
            return Ok(());
        }

        self.users
            .create(NewUser {
                public_id: Uuid::new_v4(),
                username: username.to_string(),
                email: email.to_string(),
                first_name: String::new(),
                last_name: String::new(),
                date_of_birth: None,
                pfp: DEFAULT_PROFILE_PICTURE.to_string(),
                password_hash: self.passwords.hash(password)?,
                is_staff: true,
            })
            .await
            .map_err(|e| anyhow!("{}", e))?;
        log::info!("Created admin account {}", username);
        Ok(())
    }

    // Stored pictures are normalized to 256x256 before any row points at them.
    async fn store_profile_picture(&self, file: &UploadFilePayload) -> HttpResult<String> {
        let relative = self.media.save(PROFILE_PICTURE_PREFIX, file).await?;
        let path = self.media.absolute_path(&relative);
        let images = self.images.clone();
        let resized = tokio::task::spawn_blocking(move || images.resize_profile_picture(&path))
            .await
            .map_err(|e| anyhow!("resize task failed: {}", e))
            .and_then(|result| result);
        if let Err(e) = resized {
            self.media.discard(&relative).await;
            return Err(e.into());
        }
        Ok(relative)
    }

    async fn discard(&self, stored: Option<&str>) {
        if let Some(relative) = stored {
            self.media.discard(relative).await;
        }
    }

    async fn check_username(
        &self,
        validator: &mut FormValidator<'_>,
        username: &str,
        except: Option<i64>,
    ) -> HttpResult<()> {
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            validator.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        } else if self.users.username_taken(username, except).await? {
            validator.add("username", NOT_UNIQUE);
        }
        Ok(())
    }

    async fn check_email(
        &self,
        validator: &mut FormValidator<'_>,
        email: &str,
        except: Option<i64>,
    ) -> HttpResult<()> {
        if self.users.email_taken(email, except).await? {
            validator.add("email", NOT_UNIQUE);
        }
        Ok(())
    }
}

fn check_adult(validator: &mut FormValidator<'_>, date_of_birth: NaiveDate) {
    let today = Utc::now().date_naive();
    if today.signed_duration_since(date_of_birth) < Duration::days(ADULT_AGE_DAYS) {
        validator.add("date_of_birth", "The user must be an adult. ");
    }
}

fn check_password(validator: &mut FormValidator<'_>, password: &str, username: Option<&str>) {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        validator.add(
            "password",
            &format!(
                "This password is too short. It must contain at least {PASSWORD_MIN_LENGTH} characters."
            ),
        );
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        validator.add("password", "This password is entirely numeric.");
    }
    if COMMON_PASSWORDS
        .iter()
        .any(|common| common.eq_ignore_ascii_case(password))
    {
        validator.add("password", "This password is too common.");
    }
    if let Some(username) = username {
        if !username.is_empty() && password.eq_ignore_ascii_case(username) {
            validator.add("password", "The password is too similar to the username.");
        }
    }
}

fn unique_error(error: DataError) -> HttpError {
    match error {
        DataError::Conflict(constraint) if constraint.contains("username") => {
            HttpError::field("username", NOT_UNIQUE)
        }
        DataError::Conflict(constraint) if constraint.contains("email") => {
            HttpError::field("email", NOT_UNIQUE)
        }
        other => other.into(),
    }
}
