use actix_web::{
  web,
  HttpResponse
};
use crate::content::{self, selection};
use crate::db::{self, entities::*};
use crate::utils::{text_utils, time_utils};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use super::dtos::*;
use super::error::{map_db_error, Error};
use super::helpers;
use super::AppState;

// Module with all the API handler functions, grouped public read
// side first, author dashboard side after.

// Few constants that don't qualify for the config file:
const MAX_ARTICLES: usize = 30;
// Max amount of search terms to process:
const MAX_SEARCH_TERMS: usize = 10;

/* --- Request body or query objects --- */
#[derive(Serialize, Deserialize)]
pub struct ArticlesQuery {
  pub category: Option<String>,
  pub max: Option<usize>
}

// Ownership assertion for deletes; the uid comes from the
// identity collaborator on the client.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
  pub author_id: String
}
/* --- End request body or query objects --- */

pub async fn index() -> HttpResponse {
  HttpResponse::Ok().body("DesaMedia API")
}

// Default response when no route matched the request:
pub async fn not_found() -> Result<HttpResponse, Error> {
  Err(Error::NotFound(String::from("Endpoint doesn't exist")))
}

/* --- Public read side --- */

pub async fn articles(
  app_state: web::Data<AppState>,
  query: web::Query<ArticlesQuery>
) -> Result<HttpResponse, Error> {
  let max = query.max
    .map(|m| if m > MAX_ARTICLES { MAX_ARTICLES } else { m })
    .unwrap_or(MAX_ARTICLES);
  let articles = db::published_articles(
    &app_state.pool,
    query.category.as_deref(),
    Some(max)
  ).map_err(map_db_error)?;
  let article_dtos: Vec<ArticleDto> =
    articles.into_iter().map(|a| a.into()).collect();
  Ok(HttpResponse::Ok().json(article_dtos))
}

pub async fn article(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>
) -> Result<HttpResponse, Error> {
  let article_id = path.into_inner().0;
  let article = db::article_by_id(&app_state.pool, article_id)
    .map_err(map_db_error)?;
  match article {
    Some(mut a) => {
      // One view per render, by design also for repeat readers.
      // A failed increment should never take the article down
      // with it:
      let now = time_utils::current_timestamp();
      match db::increment_views(&app_state.pool, a.id, now) {
        Ok(_) => {
          // Reflect this very read in the response:
          a.views += 1;
          a.last_viewed = Some(now);
        },
        Err(e) => error!(
          "Could not increment views for article {} - {}", a.id, e
        )
      }
      Ok(HttpResponse::Ok().json(ArticleDto::with_body(a)))
    },
    None => Err(Error::NotFound("Artikel tidak ditemukan".to_string()))
  }
}

// Related cards under an article. Query trouble degrades to an
// empty list, the frontend shows its "belum ada berita terkait"
// placeholder for that.
pub async fn related_articles(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>
) -> Result<HttpResponse, Error> {
  let article_id = path.into_inner().0;
  let current = match db::article_by_id(&app_state.pool, article_id) {
    Ok(Some(a)) => a,
    Ok(None) =>
      return Err(Error::NotFound("Artikel tidak ditemukan".to_string())),
    Err(e) => {
      warn!("Could not load article {} for related lookup - {}", article_id, e);
      return Ok(HttpResponse::Ok().json(Vec::<ArticleDto>::new()));
    }
  };
  let related = match db::published_articles(&app_state.pool, None, None) {
    Ok(all) => selection::related_articles(
      &all, &current, selection::RELATED_LIMIT
    ),
    Err(e) => {
      warn!("Related articles query failed, degrading to empty - {}", e);
      Vec::new()
    }
  };
  let dtos: Vec<ArticleDto> = related.into_iter().map(|a| a.into()).collect();
  Ok(HttpResponse::Ok().json(dtos))
}

// Popular sidebar, served from the periodically refreshed
// snapshot. A cold cache refreshes inline, anything failing
// degrades to an empty list.
pub async fn popular_articles(
  app_state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
  let mut articles = app_state.popular_cache.articles();
  if articles.is_empty() {
    articles = match app_state.popular_cache.refresh(&app_state.pool) {
      Ok(_) => app_state.popular_cache.articles(),
      Err(e) => {
        warn!("Popular refresh failed, degrading to empty - {}", e);
        Vec::new()
      }
    };
  }
  let dtos: Vec<ArticleDto> = articles.into_iter().map(|a| a.into()).collect();
  Ok(HttpResponse::Ok().json(dtos))
}

// Category sidebar with published-article counts. The stored
// list can legitimately be empty on a fresh install, the launch
// set fills in.
pub async fn categories(
  app_state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
  let stored = match db::active_categories(&app_state.pool) {
    Ok(categories) => categories,
    Err(e) => {
      warn!("Categories query failed, using the fallback set - {}", e);
      Vec::new()
    }
  };
  let names: Vec<String> = if stored.is_empty() {
    content::FALLBACK_CATEGORIES.iter().map(|n| n.to_string()).collect()
  } else {
    stored.into_iter().map(|c| c.name).collect()
  };
  let counts = db::category_counts(&app_state.pool)
    .unwrap_or_else(|e| {
      warn!("Category counts query failed - {}", e);
      Vec::new()
    });
  let dtos: Vec<CategoryDto> = names
    .into_iter()
    .map(|name| {
      let count = counts
        .iter()
        .find(|(category, _)| category == &name)
        .map(|(_, count)| *count)
        .unwrap_or(0);
      CategoryDto {
        icon: helpers::category_icon(&name).to_string(),
        count,
        name
      }
    })
    .collect();
  Ok(HttpResponse::Ok().json(dtos))
}

// Single search box term, matched against title, content, tags,
// category and author of published articles.
pub async fn search_articles(
  app_state: web::Data<AppState>,
  search_body: web::Json<SearchBody>
) -> Result<HttpResponse, Error> {
  if app_state.check_rate_limit() {
    return Err(Error::TooManyRequests);
  }
  let sanitized = text_utils::sanitize_search_terms(
    &search_body.term,
    MAX_SEARCH_TERMS
  );
  // Test that we still got search terms after sanitization!
  if sanitized.is_empty() {
    // Not an error, just nothing to search for:
    return Ok(HttpResponse::Ok().json(Vec::<SearchResultDto>::new()));
  }
  let articles = db::search_published_articles(
    &app_state.pool,
    &sanitized[..]
  ).map_err(map_db_error)?;
  Ok(
    HttpResponse::Ok().json(
      articles
        .into_iter()
        .map(Into::into)
        .collect::<Vec<SearchResultDto>>()
    )
  )
}

/* --- Author dashboard side --- */

pub async fn create_article(
  app_state: web::Data<AppState>,
  form: web::Json<ArticleForm>
) -> Result<HttpResponse, Error> {
  if app_state.check_rate_limit() {
    return Err(Error::TooManyRequests);
  }
  let form = form.into_inner();
  let errors = helpers::validate_article_form(
    &form.title, &form.category, &form.content
  );
  if !errors.is_empty() {
    return Err(Error::ValidationError(errors.join("\n")));
  }
  if form.author_id.trim().is_empty() {
    return Err(Error::BadRequest(
      String::from("authorId wajib diisi")
    ));
  }
  let mut article = form.into_article(time_utils::current_timestamp());
  db::insert_article(&app_state.pool, &mut article)
    .map_err(|e| {
      error!("Could not insert an article - {}", e);
      Error::DatabaseError(format!("Failed to insert article - {}", e))
    })?;
  info!("Article {} saved by {}", article.id, article.author);
  let message = match article.status {
    ArticleStatus::Published => "Artikel berhasil dipublikasi!",
    _ => "Artikel berhasil disimpan sebagai draft."
  };
  Ok(HttpResponse::Ok().json(
    JsonStatus::new_with_id(JsonStatusType::Success, message, article.id)
  ))
}

pub async fn update_article(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>,
  form: web::Json<ArticleEditForm>
) -> Result<HttpResponse, Error> {
  if app_state.check_rate_limit() {
    return Err(Error::TooManyRequests);
  }
  let article_id = path.into_inner().0;
  let form = form.into_inner();
  let existing = db::article_by_id(&app_state.pool, article_id)
    .map_err(map_db_error)?
    .ok_or_else(|| Error::NotFound("Artikel tidak ditemukan".to_string()))?;
  // Only the owning author gets to edit. Two authors editing the
  // same article is last-writer-wins, there's no concurrency
  // token.
  if existing.author_id != form.author_id {
    return Err(Error::Forbidden(
      String::from("Hanya penulis artikel yang dapat mengubahnya")
    ));
  }
  let errors = helpers::validate_article_edit(
    form.title.as_deref(),
    form.content.as_deref()
  );
  if !errors.is_empty() {
    return Err(Error::ValidationError(errors.join("\n")));
  }
  let update = form.into_update(time_utils::current_timestamp());
  db::update_article(&app_state.pool, article_id, &update)
    .map_err(map_db_error)?;
  Ok(HttpResponse::Ok().json(
    JsonStatus::new_with_id(
      JsonStatusType::Success,
      "Artikel berhasil diupdate!",
      article_id
    )
  ))
}

// No soft delete: gone is gone, also from every listing.
pub async fn delete_article(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>,
  query: web::Query<OwnerQuery>
) -> Result<HttpResponse, Error> {
  if app_state.check_rate_limit() {
    return Err(Error::TooManyRequests);
  }
  let article_id = path.into_inner().0;
  let existing = db::article_by_id(&app_state.pool, article_id)
    .map_err(map_db_error)?
    .ok_or_else(|| Error::NotFound("Artikel tidak ditemukan".to_string()))?;
  if existing.author_id != query.author_id {
    return Err(Error::Forbidden(
      String::from("Hanya penulis artikel yang dapat menghapusnya")
    ));
  }
  db::delete_article(&app_state.pool, article_id)
    .map_err(map_db_error)?;
  info!("Article {} deleted by {}", article_id, existing.author);
  Ok(HttpResponse::Ok().json(
    JsonStatus::new(JsonStatusType::Success, "Artikel berhasil dihapus.")
  ))
}

// Everything the author wrote plus the dashboard counters.
pub async fn author_articles(
  app_state: web::Data<AppState>,
  path: web::Path<(String,)>
) -> Result<HttpResponse, Error> {
  let author_id = path.into_inner().0;
  let articles = db::author_articles(&app_state.pool, &author_id)
    .map_err(map_db_error)?;
  Ok(HttpResponse::Ok().json(DashboardDto::new(articles)))
}

pub async fn user_profile(
  app_state: web::Data<AppState>,
  path: web::Path<(String,)>
) -> Result<HttpResponse, Error> {
  let username = path.into_inner().0;
  let user = db::user_by_username(&app_state.pool, &username)
    .map_err(map_db_error)?;
  match user {
    Some(user) => Ok(HttpResponse::Ok().json(ProfileDto::from(user))),
    None => Err(Error::NotFound("Profil tidak ditemukan".to_string()))
  }
}

// Profiles are mutated only by their owner; the uid in the path
// is the identity the auth collaborator handed the client.
pub async fn update_profile(
  app_state: web::Data<AppState>,
  path: web::Path<(String,)>,
  form: web::Json<ProfileForm>
) -> Result<HttpResponse, Error> {
  if app_state.check_rate_limit() {
    return Err(Error::TooManyRequests);
  }
  let uid = path.into_inner().0;
  let form = form.into_inner();
  db::user_by_uid(&app_state.pool, &uid)
    .map_err(map_db_error)?
    .ok_or_else(|| Error::NotFound("Profil tidak ditemukan".to_string()))?;
  if let Some(name) = &form.name {
    let errors = helpers::validate_profile_form(name);
    if !errors.is_empty() {
      return Err(Error::ValidationError(errors.join("\n")));
    }
  }
  let update = UserUpdate {
    name: form.name,
    bio: form.bio,
    photo: form.photo
  };
  db::update_user(&app_state.pool, &uid, &update)
    .map_err(map_db_error)?;
  Ok(HttpResponse::Ok().json(
    JsonStatus::new(JsonStatusType::Success, "Profil berhasil diperbarui.")
  ))
}
