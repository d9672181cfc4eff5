use std::collections::HashMap;

use mongodb::bson::{doc, oid::ObjectId, to_bson};
use mongodb::options::UpdateOptions;

use crate::{
    AppState,
    models::{CurrentUser, User, UserFilters},
};

use super::FieldErrors;

pub async fn get_profile(state: &AppState, user_id: ObjectId) -> Result<Option<User>, String> {
    let users = state.db.collection::<User>("users");
    users
        .find_one(doc! { "_id": user_id }, None)
        .await
        .map_err(|e| e.to_string())
}

/// Replace the user's announcement filter preferences. The user
/// document is created on first write if the auth layer knows about an
/// account the collection has not seen yet.
pub async fn update_filters(
    state: &AppState,
    current: &CurrentUser,
    phone_number: Option<String>,
    filters: UserFilters,
) -> Result<User, FieldErrors> {
    let mut errs: FieldErrors = HashMap::new();

    // Empty string clears the number; anything else must look like one.
    let phone_number = match phone_number.map(|p| p.trim().to_string()) {
        Some(p) if p.is_empty() => None,
        Some(p) => {
            let len = p.chars().count();
            if !(8..=20).contains(&len) {
                errs.insert(
                    "phoneNumber".into(),
                    "Phone number must be 8-20 characters.".into(),
                );
                return Err(errs);
            }
            Some(p)
        }
        None => None,
    };

    let filters_bson = match to_bson(&filters) {
        Ok(b) => b,
        Err(e) => {
            errs.insert("_form".into(), format!("encode error: {e}"));
            return Err(errs);
        }
    };

    let users = state.db.collection::<User>("users");
    let update = doc! {
        "$set": {
            "phoneNumber": phone_number.clone(),
            "filters": filters_bson,
        },
        "$setOnInsert": {
            "email": &current.email,
            "username": &current.username,
        },
    };

    if let Err(e) = users
        .update_one(
            doc! { "_id": current.id },
            update,
            UpdateOptions::builder().upsert(true).build(),
        )
        .await
    {
        errs.insert("_form".into(), format!("db error: {e}"));
        return Err(errs);
    }

    match get_profile(state, current.id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            errs.insert("_form".into(), "User not found.".into());
            Err(errs)
        }
        Err(e) => {
            errs.insert("_form".into(), format!("db error: {e}"));
            Err(errs)
        }
    }
}
