use crate::domain::model::{NormalizedUser, RawUser};

pub fn normalize(user: RawUser) -> NormalizedUser {
    NormalizedUser {
        id: user.id.trim().to_string(),
        name: user.name.trim().to_string(),
        email: user.email.trim().to_string(),
        age: user.age,
    }
}
