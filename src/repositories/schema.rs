use sqlx::PgPool;

/// Idempotent DDL, applied in order at startup.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS postgis",
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        public_id UUID NOT NULL UNIQUE,
        username VARCHAR(150) NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        first_name VARCHAR(150) NOT NULL DEFAULT '',
        last_name VARCHAR(150) NOT NULL DEFAULT '',
        date_of_birth DATE,
        pfp TEXT NOT NULL DEFAULT 'defaults/users/default.png',
        password_hash TEXT NOT NULL,
        is_staff BOOLEAN NOT NULL DEFAULT FALSE,
        is_active BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS places (
        id BIGSERIAL PRIMARY KEY,
        public_id UUID NOT NULL UNIQUE,
        name VARCHAR(64) NOT NULL,
        description VARCHAR(256),
        main_image TEXT NOT NULL DEFAULT 'defaults/places/default.png',
        added_by BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        location GEOGRAPHY(Point, 4326) NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        experience INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS places_location_gist ON places USING GIST (location)",
    r#"
    CREATE TABLE IF NOT EXISTS place_photos (
        id BIGSERIAL PRIMARY KEY,
        public_id UUID NOT NULL UNIQUE,
        place_id BIGINT NOT NULL REFERENCES places(id) ON DELETE CASCADE,
        owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        image TEXT NOT NULL,
        title VARCHAR(64) NOT NULL,
        description VARCHAR(256) NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS place_photos_place_id ON place_photos (place_id)",
    r#"
    CREATE TABLE IF NOT EXISTS place_photo_likes (
        id BIGSERIAL PRIMARY KEY,
        owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        place_photo_id BIGINT NOT NULL REFERENCES place_photos(id) ON DELETE CASCADE,
        CONSTRAINT place_photo_likes_owner_photo_unique UNIQUE (owner_id, place_photo_id)
    )
    "#,
];

pub async fn ensure_schema(pool: &PgPool) -> sqlx::Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    log::info!("Database schema is up to date");
    Ok(())
}
