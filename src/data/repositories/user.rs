use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use diesel::dsl::exists;
use diesel::prelude::*;

use crate::data::models::{AuthError, NewUser, User};
use crate::schema::users;

pub struct UserRepository;

impl UserRepository {
    pub fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<User>, diesel::result::Error> {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn verify_password(
        stored_hash: &str,
        input_password: &str,
    ) -> Result<bool, bcrypt::BcryptError> {
        verify(input_password, stored_hash)
    }

    /// Hashes the password and stores a new learner account
    pub fn create_user(
        conn: &mut SqliteConnection,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let hashed_password = hash(password, DEFAULT_COST)?;

        diesel::insert_into(users::table)
            .values(&NewUser {
                email,
                password: &hashed_password,
                created_at: Utc::now().naive_utc(),
            })
            .execute(conn)?;

        let user = users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(conn)?;
        Ok(user)
    }

    pub fn email_exists(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<bool, diesel::result::Error> {
        diesel::select(exists(users::table.filter(users::email.eq(email)))).get_result(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize_schema;

    fn test_connection() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        initialize_schema(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_create_and_verify_user() {
        let mut conn = test_connection();
        assert!(!UserRepository::email_exists(&mut conn, "ana@example.com").unwrap());

        let user = UserRepository::create_user(&mut conn, "ana@example.com", "correct horse").unwrap();
        assert_ne!(user.password, "correct horse");
        assert!(UserRepository::email_exists(&mut conn, "ana@example.com").unwrap());

        let found = UserRepository::find_by_email(&mut conn, "ana@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, user.user_id);
        assert!(UserRepository::verify_password(&found.password, "correct horse").unwrap());
        assert!(!UserRepository::verify_password(&found.password, "wrong horse").unwrap());
    }

    #[test]
    fn test_duplicate_email_is_rejected_by_database() {
        let mut conn = test_connection();
        UserRepository::create_user(&mut conn, "ana@example.com", "password1").unwrap();
        assert!(UserRepository::create_user(&mut conn, "ana@example.com", "password2").is_err());
    }
}
