#[derive(Clone, Debug)]
pub struct User {
    pub user_id: i64,
    pub creation_time: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
}

#[derive(Clone, Debug)]
pub struct PendingRegistration {
    pub email: String,
    pub creation_time: i64,
    pub name: String,
    pub password_hash: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtpKind {
    Registration = 0,
    Reset = 1,
}

impl TryFrom<i64> for OtpKind {
    type Error = i64;

    fn try_from(value: i64) -> Result<OtpKind, i64> {
        match value {
            0 => Ok(OtpKind::Registration),
            1 => Ok(OtpKind::Reset),
            x => Err(x),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Otp {
    pub otp_id: i64,
    pub creation_time: i64,
    pub otp_kind: OtpKind,
    pub owner_email: String,
    pub code: String,
    pub expires_at: i64,
    pub used: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Access = 0,
    Refresh = 1,
    // a cancel row shadows the token with the same hash
    Cancel = 2,
}

impl TryFrom<i64> for TokenKind {
    type Error = i64;

    fn try_from(value: i64) -> Result<TokenKind, i64> {
        match value {
            0 => Ok(TokenKind::Access),
            1 => Ok(TokenKind::Refresh),
            2 => Ok(TokenKind::Cancel),
            x => Err(x),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionToken {
    pub token_id: i64,
    pub creation_time: i64,
    pub creator_user_id: i64,
    pub token_hash: String,
    pub token_kind: TokenKind,
    pub duration: i64,
}
