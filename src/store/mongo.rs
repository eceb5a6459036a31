use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::{Movie, Review, UpdateMovie, User, WatchlistEntry};

use super::{MovieFilter, MovieSort, MovieStore, Page, ReviewStore, UserStore, WatchlistStore};

pub const MOVIES: &str = "movies";
pub const REVIEWS: &str = "reviews";
pub const USERS: &str = "users";
pub const WATCHLIST: &str = "watchlist";

/// MongoDB duplicate-key write error code
const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

fn inserted_object_id(result: mongodb::results::InsertOneResult) -> AppResult<ObjectId> {
    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::Internal("insert did not return an ObjectId".to_string()))
}

/// Movie collection backed by MongoDB
#[derive(Clone)]
pub struct MongoMovieStore {
    collection: Collection<Movie>,
}

impl MongoMovieStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Movie>(MOVIES),
        }
    }

    fn filter_doc(filter: &MovieFilter) -> Document {
        let mut doc = Document::new();
        if let Some(genre) = &filter.genre {
            doc.insert("genres", genre.clone());
        }
        if let Some(year) = filter.year {
            doc.insert("release_year", year);
        }
        doc
    }

    fn sort_doc(sort: MovieSort) -> Document {
        match sort {
            MovieSort::Rating => doc! { "average_rating": -1, "total_reviews": -1 },
            MovieSort::Year => doc! { "release_year": -1 },
            MovieSort::Title => doc! { "title": 1 },
        }
    }
}

#[async_trait]
impl MovieStore for MongoMovieStore {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Movie>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    async fn list(
        &self,
        filter: MovieFilter,
        sort: MovieSort,
        page: Page,
    ) -> AppResult<Vec<Movie>> {
        let options = FindOptions::builder()
            .sort(Self::sort_doc(sort))
            .skip(page.skip())
            .limit(page.limit)
            .build();
        let cursor = self
            .collection
            .find(Self::filter_doc(&filter), options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, filter: MovieFilter) -> AppResult<u64> {
        Ok(self
            .collection
            .count_documents(Self::filter_doc(&filter), None)
            .await?)
    }

    async fn insert(&self, movie: &Movie) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(movie, None).await?;
        inserted_object_id(result)
    }

    async fn update(&self, id: ObjectId, changes: &UpdateMovie) -> AppResult<bool> {
        let mut set = Document::new();
        if let Some(title) = &changes.title {
            set.insert("title", title.clone());
        }
        if let Some(genres) = &changes.genres {
            set.insert("genres", genres.clone());
        }
        if let Some(year) = changes.release_year {
            set.insert("release_year", year);
        }
        if let Some(director) = &changes.director {
            set.insert("director", director.clone());
        }
        if let Some(synopsis) = &changes.synopsis {
            set.insert("synopsis", synopsis.clone());
        }
        if let Some(poster_url) = &changes.poster_url {
            set.insert("poster_url", poster_url.clone());
        }
        if let Some(cast) = &changes.cast {
            set.insert("cast", cast.clone());
        }
        if let Some(runtime) = changes.runtime_minutes {
            set.insert("runtime_minutes", runtime);
        }
        if let Some(rating) = changes.external_rating {
            set.insert("external_rating", rating);
        }
        if let Some(box_office) = &changes.box_office {
            set.insert("box_office", box_office.clone());
        }
        set.insert("updated_at", mongodb::bson::DateTime::now());

        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn set_aggregates(
        &self,
        id: ObjectId,
        average_rating: f64,
        total_reviews: u64,
    ) -> AppResult<()> {
        // One rating per review, so total_ratings mirrors total_reviews.
        let total = Bson::Int64(total_reviews as i64);
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "average_rating": average_rating,
                    "total_ratings": total.clone(),
                    "total_reviews": total,
                } },
                None,
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }
}

/// Review collection backed by MongoDB
#[derive(Clone)]
pub struct MongoReviewStore {
    collection: Collection<Review>,
}

impl MongoReviewStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Review>(REVIEWS),
        }
    }

    async fn find_all(&self, filter: Document) -> AppResult<Vec<Review>> {
        let cursor = self.collection.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_page(&self, filter: Document, page: Page) -> AppResult<Vec<Review>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(page.skip())
            .limit(page.limit)
            .build();
        let cursor = self.collection.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl ReviewStore for MongoReviewStore {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Review>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_user_and_movie(
        &self,
        user_id: ObjectId,
        movie_id: ObjectId,
    ) -> AppResult<Option<Review>> {
        Ok(self
            .collection
            .find_one(doc! { "user_id": user_id, "movie_id": movie_id }, None)
            .await?)
    }

    async fn list_for_movie(&self, movie_id: ObjectId, page: Page) -> AppResult<Vec<Review>> {
        self.find_page(doc! { "movie_id": movie_id }, page).await
    }

    async fn list_for_user(&self, user_id: ObjectId, page: Page) -> AppResult<Vec<Review>> {
        self.find_page(doc! { "user_id": user_id }, page).await
    }

    async fn all_for_movie(&self, movie_id: ObjectId) -> AppResult<Vec<Review>> {
        self.find_all(doc! { "movie_id": movie_id }).await
    }

    async fn all_for_user(&self, user_id: ObjectId) -> AppResult<Vec<Review>> {
        self.find_all(doc! { "user_id": user_id }).await
    }

    async fn count_for_movie(&self, movie_id: ObjectId) -> AppResult<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "movie_id": movie_id }, None)
            .await?)
    }

    async fn count_for_user(&self, user_id: ObjectId) -> AppResult<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "user_id": user_id }, None)
            .await?)
    }

    async fn insert(&self, review: &Review) -> AppResult<ObjectId> {
        // The unique (user_id, movie_id) index backs up the service-level
        // duplicate pre-check against concurrent inserts.
        match self.collection.insert_one(review, None).await {
            Ok(result) => inserted_object_id(result),
            Err(e) if is_duplicate_key(&e) => Err(AppError::DuplicateReview),
            Err(e) => Err(e.into()),
        }
    }

    async fn replace(&self, review: &Review) -> AppResult<()> {
        let id = review
            .id
            .ok_or_else(|| AppError::Internal("cannot replace an unsaved review".to_string()))?;
        self.collection
            .replace_one(doc! { "_id": id }, review, None)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_for_movie(&self, movie_id: ObjectId) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "movie_id": movie_id }, None)
            .await?;
        Ok(result.deleted_count)
    }
}

/// User collection backed by MongoDB
#[derive(Clone)]
pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>(USERS),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "email": email }, None)
            .await?)
    }

    async fn insert(&self, user: &User) -> AppResult<ObjectId> {
        match self.collection.insert_one(user, None).await {
            Ok(result) => inserted_object_id(result),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict(
                "username or email already in use".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_aggregates(
        &self,
        id: ObjectId,
        average_rating: f64,
        total_reviews: u64,
    ) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "average_rating": average_rating,
                    "total_reviews": Bson::Int64(total_reviews as i64),
                } },
                None,
            )
            .await?;
        Ok(())
    }
}

/// Watchlist collection backed by MongoDB
#[derive(Clone)]
pub struct MongoWatchlistStore {
    collection: Collection<WatchlistEntry>,
}

impl MongoWatchlistStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<WatchlistEntry>(WATCHLIST),
        }
    }
}

#[async_trait]
impl WatchlistStore for MongoWatchlistStore {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<WatchlistEntry>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_user_and_movie(
        &self,
        user_id: ObjectId,
        movie_id: ObjectId,
    ) -> AppResult<Option<WatchlistEntry>> {
        Ok(self
            .collection
            .find_one(doc! { "user_id": user_id, "movie_id": movie_id }, None)
            .await?)
    }

    async fn list_for_user(
        &self,
        user_id: ObjectId,
        page: Page,
    ) -> AppResult<Vec<WatchlistEntry>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(page.skip())
            .limit(page.limit)
            .build();
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count_for_user(&self, user_id: ObjectId) -> AppResult<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "user_id": user_id }, None)
            .await?)
    }

    async fn insert(&self, entry: &WatchlistEntry) -> AppResult<ObjectId> {
        match self.collection.insert_one(entry, None).await {
            Ok(result) => inserted_object_id(result),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict(
                "movie is already on the watchlist".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn replace(&self, entry: &WatchlistEntry) -> AppResult<()> {
        let id = entry.id.ok_or_else(|| {
            AppError::Internal("cannot replace an unsaved watchlist entry".to_string())
        })?;
        self.collection
            .replace_one(doc! { "_id": id }, entry, None)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_for_movie(&self, movie_id: ObjectId) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "movie_id": movie_id }, None)
            .await?;
        Ok(result.deleted_count)
    }
}
