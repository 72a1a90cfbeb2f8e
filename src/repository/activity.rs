//! Repository implementation for the activity log.

use diesel::prelude::*;

use crate::{
    domain::activity::{ActivityEntry, NewActivityEntry},
    repository::errors::RepositoryResult,
    repository::{ActivityListQuery, ActivityReader, ActivityWriter, DieselRepository},
};

impl ActivityReader for DieselRepository {
    fn list_activity(
        &self,
        query: ActivityListQuery,
    ) -> RepositoryResult<(usize, Vec<ActivityEntry>)> {
        use crate::models::activity::ActivityEntry as DbActivityEntry;
        use crate::schema::activity_log;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = activity_log::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(user_id) = query.user_id {
                items = items.filter(activity_log::user_id.eq(user_id));
            }
            if let Some((entity_type, entity_id)) = &query.entity {
                items = items
                    .filter(activity_log::entity_type.eq(entity_type.to_string()))
                    .filter(activity_log::entity_id.eq(entity_id));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(activity_log::created_at.desc());
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let entries = items
            .load::<DbActivityEntry>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total, entries))
    }
}

impl ActivityWriter for DieselRepository {
    fn log_activity(&self, entry: &NewActivityEntry) -> RepositoryResult<ActivityEntry> {
        use crate::models::activity::{
            ActivityEntry as DbActivityEntry, NewActivityEntry as DbNewActivityEntry,
        };
        use crate::schema::activity_log;

        let mut conn = self.conn()?;
        let insertable: DbNewActivityEntry = entry.into();

        let created = diesel::insert_into(activity_log::table)
            .values(&insertable)
            .get_result::<DbActivityEntry>(&mut conn)?;

        Ok(created.into())
    }
}
