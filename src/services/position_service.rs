use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;

use crate::{AppState, models::Position};

pub async fn list(state: &AppState, user_id: ObjectId) -> Result<Vec<Position>, String> {
    let positions = state.db.collection::<Position>("positions");
    let find_opts = FindOptions::builder().sort(doc! { "updated_at": -1 }).build();

    let mut cursor = positions
        .find(doc! { "user_id": user_id }, find_opts)
        .await
        .map_err(|e| e.to_string())?;

    let mut out: Vec<Position> = vec![];
    while let Some(res) = cursor.next().await {
        out.push(res.map_err(|e| e.to_string())?);
    }
    Ok(out)
}

/// Closing a position removes its document. Returns false when the id
/// does not exist or belongs to someone else.
pub async fn close(state: &AppState, user_id: ObjectId, id: ObjectId) -> Result<bool, String> {
    let positions = state.db.collection::<Position>("positions");

    let res = positions
        .delete_one(doc! { "_id": id, "user_id": user_id }, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(res.deleted_count > 0)
}
