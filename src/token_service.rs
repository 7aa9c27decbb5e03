use super::db_types::{SessionToken, TokenKind};
use rusqlite::{params, Connection, OptionalExtension, Row};

impl TryFrom<&Row<'_>> for SessionToken {
    type Error = rusqlite::Error;

    // select token_id, creation_time, creator_user_id, token_hash, token_kind, duration order only
    fn try_from(row: &Row) -> Result<SessionToken, rusqlite::Error> {
        Ok(SessionToken {
            token_id: row.get(0)?,
            creation_time: row.get(1)?,
            creator_user_id: row.get(2)?,
            token_hash: row.get(3)?,
            token_kind: row
                .get::<_, i64>(4)?
                .try_into()
                .map_err(|x| rusqlite::Error::IntegralValueOutOfRange(4, x))?,
            duration: row.get(5)?,
        })
    }
}

const COLUMNS: &str = "token_id, creation_time, creator_user_id, token_hash, token_kind, duration";

pub fn add(
    con: &Connection,
    creator_user_id: i64,
    token_hash: String,
    token_kind: TokenKind,
    duration: i64,
    creation_time: i64,
) -> Result<SessionToken, rusqlite::Error> {
    let sql = "INSERT INTO token_t(creation_time, creator_user_id, token_hash, token_kind, duration)
               VALUES (?, ?, ?, ?, ?)";
    con.execute(
        sql,
        params![
            creation_time,
            creator_user_id,
            token_hash,
            token_kind as i64,
            duration
        ],
    )?;

    Ok(SessionToken {
        token_id: con.last_insert_rowid(),
        creation_time,
        creator_user_id,
        token_hash,
        token_kind,
        duration,
    })
}

// newest row wins, so a later cancel row shadows the token it revokes
pub fn get_by_token_hash(
    con: &Connection,
    token_hash: &str,
) -> Result<Option<SessionToken>, rusqlite::Error> {
    let sql = format!(
        "SELECT {} FROM token_t WHERE token_hash=? ORDER BY token_id DESC LIMIT 1",
        COLUMNS
    );
    con.query_row(&sql, params![token_hash], |row| row.try_into())
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_init;

    fn test_con() -> Connection {
        let mut con = Connection::open_in_memory().unwrap();
        db_init::initialize(&mut con).unwrap();
        con
    }

    #[test]
    fn cancel_row_shadows_original() {
        let con = test_con();

        add(
            &con,
            7,
            "hash".to_owned(),
            TokenKind::Refresh,
            1000,
            1000,
        )
        .unwrap();

        let latest = get_by_token_hash(&con, "hash").unwrap().unwrap();
        assert_eq!(latest.token_kind, TokenKind::Refresh);
        assert!(latest.token_id > 0);

        add(&con, 7, "hash".to_owned(), TokenKind::Cancel, 0, 2000).unwrap();

        let latest = get_by_token_hash(&con, "hash").unwrap().unwrap();
        assert_eq!(latest.token_kind, TokenKind::Cancel);
    }

    #[test]
    fn unknown_hash_is_none() {
        let con = test_con();
        assert!(get_by_token_hash(&con, "missing").unwrap().is_none());
    }
}
