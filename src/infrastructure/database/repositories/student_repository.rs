//! SeaORM implementation of StudentStore

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr,
};
use tracing::debug;

use crate::domain::{
    DomainError, DomainResult, NewStudent, Student, StudentFilter, StudentPatch, StudentStore,
};
use crate::infrastructure::database::cache::{ReadCache, ReadKey};
use crate::infrastructure::database::entities::student;
use crate::infrastructure::database::search::{name_search_for, search_key, NameSearch};

struct StudentReadCache {
    counts: ReadCache<ReadKey, u64>,
    rows: ReadCache<ReadKey, Vec<Student>>,
    ones: ReadCache<ReadKey, Option<Student>>,
}

impl StudentReadCache {
    fn new(ttl: Duration) -> Self {
        Self {
            counts: ReadCache::new(ttl),
            rows: ReadCache::new(ttl),
            ones: ReadCache::new(ttl),
        }
    }

    fn invalidate(&self) {
        self.counts.invalidate();
        self.rows.invalidate();
        self.ones.invalidate();
    }
}

pub struct SeaOrmStudentStore {
    db: DatabaseConnection,
    search: Box<dyn NameSearch>,
    cache: Option<StudentReadCache>,
}

impl SeaOrmStudentStore {
    /// Store without a read cache. The name-search strategy follows the
    /// backend `db` is connected to.
    pub fn new(db: DatabaseConnection) -> Self {
        let search = name_search_for(db.get_database_backend());
        Self {
            db,
            search,
            cache: None,
        }
    }

    /// Cache reads for `ttl`; writes going through the repository clear it.
    pub fn with_cache(mut self, ttl: Duration) -> Self {
        self.cache = Some(StudentReadCache::new(ttl));
        self
    }

    fn condition(&self, filter: &StudentFilter) -> Condition {
        match filter {
            StudentFilter::All => Condition::all(),
            StudentFilter::NameContains(needle) => {
                Condition::all().add(self.search.contains(needle))
            }
            StudentFilter::Rga(rga) => Condition::all().add(student::Column::Rga.eq(rga.as_str())),
            StudentFilter::Duplicate { name, rga, course } => Condition::any()
                .add(student::Column::Rga.eq(rga.as_str()))
                .add(
                    Condition::all()
                        .add(student::Column::Name.eq(name.as_str()))
                        .add(student::Column::Rga.eq(rga.as_str()))
                        .add(student::Column::Course.eq(course.as_str())),
                ),
        }
    }

    fn ordered(&self, filter: &StudentFilter) -> Select<student::Entity> {
        student::Entity::find()
            .filter(self.condition(filter))
            .order_by_asc(student::Column::RegisteredIn)
            .order_by_asc(student::Column::Id)
    }
}

async fn read_through<V, Fut>(
    cache: Option<&ReadCache<ReadKey, V>>,
    key: ReadKey,
    load: Fut,
) -> DomainResult<V>
where
    V: Clone,
    Fut: Future<Output = Result<V, DbErr>>,
{
    let Some(cache) = cache else {
        return Ok(load.await?);
    };

    if let Some(hit) = cache.get(&key) {
        metrics::counter!("student_read_cache_hits_total").increment(1);
        return Ok(hit);
    }
    metrics::counter!("student_read_cache_misses_total").increment(1);

    let generation = cache.generation();
    let value = load.await?;
    cache.put(key, value.clone(), generation);
    Ok(value)
}

/// A unique-index violation can only come from `students.rga`.
fn write_err(e: DbErr, rga: Option<&str>) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::Conflict(match rga {
            Some(rga) => format!("Student with rga '{}' already exists", rga),
            None => "Student with this rga already exists".to_string(),
        }),
        _ => DomainError::Store(e),
    }
}

fn to_domain(models: Vec<student::Model>) -> Vec<Student> {
    models.into_iter().map(Student::from).collect()
}

#[async_trait]
impl StudentStore for SeaOrmStudentStore {
    async fn count(&self, filter: &StudentFilter) -> DomainResult<u64> {
        let load = student::Entity::find()
            .filter(self.condition(filter))
            .count(&self.db);
        read_through(
            self.cache.as_ref().map(|c| &c.counts),
            ReadKey::Count(filter.clone()),
            load,
        )
        .await
    }

    async fn fetch_all(&self, filter: &StudentFilter) -> DomainResult<Vec<Student>> {
        let query = self.ordered(filter);
        let load = async move { query.all(&self.db).await.map(to_domain) };
        read_through(
            self.cache.as_ref().map(|c| &c.rows),
            ReadKey::All(filter.clone()),
            load,
        )
        .await
    }

    async fn fetch_window(
        &self,
        filter: &StudentFilter,
        offset: u64,
        limit: u64,
    ) -> DomainResult<Vec<Student>> {
        let query = self.ordered(filter).offset(offset).limit(limit);
        let load = async move { query.all(&self.db).await.map(to_domain) };
        read_through(
            self.cache.as_ref().map(|c| &c.rows),
            ReadKey::Window {
                filter: filter.clone(),
                offset,
                limit,
            },
            load,
        )
        .await
    }

    async fn fetch_one(&self, id: &str) -> DomainResult<Option<Student>> {
        let load = async move {
            student::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .map(|m| m.map(Student::from))
        };
        read_through(
            self.cache.as_ref().map(|c| &c.ones),
            ReadKey::One(id.to_string()),
            load,
        )
        .await
    }

    async fn insert(&self, new: NewStudent) -> DomainResult<Student> {
        let rga = new.rga.clone();
        let model = student::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            rga: Set(new.rga),
            name_search: Set(search_key(&new.name)),
            name: Set(new.name),
            course: Set(new.course),
            status: Set(new.status.map(Into::into)),
            registered_in: Set(Utc::now()),
        };

        let created = model
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, Some(&rga)))?;
        Ok(created.into())
    }

    async fn update_fields(&self, id: &str, patch: StudentPatch) -> DomainResult<Option<Student>> {
        let existing = student::Entity::find_by_id(id).one(&self.db).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(existing.into()));
        }

        let rga = patch.rga.clone();
        let mut active: student::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            active.name_search = Set(search_key(&name));
            active.name = Set(name);
        }
        if let Some(rga) = patch.rga {
            active.rga = Set(rga);
        }
        if let Some(course) = patch.course {
            active.course = Set(course);
        }
        if let Some(status) = patch.status {
            active.status = Set(Some(status.into()));
        }

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, rga.as_deref()))?;
        Ok(Some(updated.into()))
    }

    async fn delete_by_id(&self, id: &str) -> DomainResult<Option<Student>> {
        let existing = student::Entity::find_by_id(id).one(&self.db).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let result = student::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(existing.into()))
    }

    async fn invalidate_read_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate();
            debug!("Student read cache invalidated");
        }
    }
}
