use mongodb::{
    bson::doc,
    options::IndexOptions,
    Database, IndexModel,
};

pub async fn ensure_indexes(db: &Database) -> Result<(), String> {
    // users: unique email
    {
        let col = db.collection::<mongodb::bson::Document>("users");
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // watchlist: one entry per (user_id, query)
    {
        let col = db.collection::<mongodb::bson::Document>("watchlist");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "query": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // alerts: one alert per (watchlist_id, platform)
    {
        let col = db.collection::<mongodb::bson::Document>("alerts");
        let model = IndexModel::builder()
            .keys(doc! { "watchlist_id": 1, "platform": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // snapshots: history reads filter by watchlist and time window
    {
        let col = db.collection::<mongodb::bson::Document>("snapshots");
        let model = IndexModel::builder()
            .keys(doc! { "watchlist_id": 1, "collected_at": 1 })
            .build();

        let _ = col.create_index(model, None).await;
    }

    Ok(())
}
