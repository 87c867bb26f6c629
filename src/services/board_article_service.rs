use serde::Deserialize;
use surrealdb::sql::Thing;
use tracing::info;
use validator::Validate;

use crate::{
    database::client::Db,
    entities::{
        community::board_article_entity::{
            BoardArticle, BoardArticleCategory, BoardArticleDbService, BoardArticleStatus,
            CreateBoardArticle, UpdateBoardArticleData, SORT_FIELDS, TABLE_NAME,
        },
        mark::MarkGroup,
        member::member_entity::{MemberDbService, MemberType, TABLE_NAME as MEMBER_TABLE_NAME},
        view::ViewGroup,
    },
    interfaces::repositories::{
        mark::MarksRepositoryInterface, view::ViewsRepositoryInterface,
    },
    middleware::{
        ctx::Ctx,
        error::{AppError, CtxResult},
        utils::{
            db_utils::{Listing, QryConditions, QryOrder},
            string_utils::get_table_thing,
        },
    },
    models::{
        inquiry::sorted_pagination,
        view::{board_article::BoardArticleView, RemovedView},
    },
    utils::validate_utils::validate_not_blank,
};

use super::{mark_service::MarkService, view_service::ViewService};

const MEMBER_ARTICLES: &str = "member_articles";

#[derive(Debug, Deserialize, Validate)]
pub struct BoardArticleInput {
    pub article_category: BoardArticleCategory,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub article_title: String,
    #[validate(custom(function = validate_not_blank), length(max = 5000))]
    pub article_content: String,
    #[validate(custom(function = validate_not_blank))]
    pub article_image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BoardArticleUpdateInput {
    pub id: String,
    pub article_category: Option<BoardArticleCategory>,
    pub article_status: Option<BoardArticleStatus>,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub article_title: Option<String>,
    #[validate(custom(function = validate_not_blank), length(max = 5000))]
    pub article_content: Option<String>,
    #[validate(custom(function = validate_not_blank))]
    pub article_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoardArticleSearch {
    pub article_category: Option<BoardArticleCategory>,
    pub member_id: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BoardArticlesInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
    pub sort: Option<String>,
    pub direction: Option<QryOrder>,
    #[serde(default)]
    pub search: BoardArticleSearch,
}

#[derive(Debug, Default, Deserialize)]
pub struct AllBoardArticlesSearch {
    pub article_status: Option<BoardArticleStatus>,
    pub article_category: Option<BoardArticleCategory>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AllBoardArticlesInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
    pub sort: Option<String>,
    pub direction: Option<QryOrder>,
    #[serde(default)]
    pub search: AllBoardArticlesSearch,
}

pub struct BoardArticleService<'a, M, V>
where
    M: MarksRepositoryInterface,
    V: ViewsRepositoryInterface,
{
    ctx: &'a Ctx,
    article_repository: BoardArticleDbService<'a>,
    member_repository: MemberDbService<'a>,
    mark_service: MarkService<'a, M>,
    view_service: ViewService<'a, V>,
}

impl<'a, M, V> BoardArticleService<'a, M, V>
where
    M: MarksRepositoryInterface,
    V: ViewsRepositoryInterface,
{
    pub fn new(db: &'a Db, ctx: &'a Ctx, marks: &'a M, views: &'a V) -> Self {
        Self {
            ctx,
            article_repository: BoardArticleDbService { db, ctx },
            member_repository: MemberDbService { db, ctx },
            mark_service: MarkService::new(db, ctx, marks),
            view_service: ViewService::new(db, ctx, views),
        }
    }

    pub fn parse_id(&self, id: &str) -> CtxResult<Thing> {
        get_table_thing(TABLE_NAME, id).map_err(|e| self.ctx.to_ctx_error(e))
    }

    pub async fn create_board_article(
        &self,
        me: &Thing,
        input: BoardArticleInput,
    ) -> CtxResult<BoardArticleView> {
        input.validate()?;
        self.member_repository.must_be_active(me, &[]).await?;

        let article = self
            .article_repository
            .create(CreateBoardArticle {
                article_category: input.article_category,
                article_title: input.article_title.trim().to_string(),
                article_content: input.article_content,
                article_image: input.article_image,
                member_id: me.clone(),
            })
            .await?;

        self.member_repository
            .stats_editor(me, MEMBER_ARTICLES, 1)
            .await?;

        self.view_of(&article.id, Some(me.clone())).await
    }

    pub async fn get_board_article(
        &self,
        viewer: Option<Thing>,
        id: &Thing,
    ) -> CtxResult<BoardArticleView> {
        self.article_repository
            .get_active(id)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))?;

        if let Some(viewer) = viewer.as_ref() {
            self.view_service
                .record_view(viewer, id, ViewGroup::Article)
                .await?;
        }
        self.view_of(id, viewer).await
    }

    pub async fn update_board_article(
        &self,
        me: &Thing,
        input: BoardArticleUpdateInput,
    ) -> CtxResult<BoardArticleView> {
        input.validate()?;
        self.member_repository.must_be_active(me, &[]).await?;

        let id = self.parse_id(&input.id)?;
        let status = input.article_status;
        let updated = self
            .article_repository
            .update_own_active(&id, me, update_data(input))
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::UpdateFailed))?;

        if status == Some(BoardArticleStatus::Delete) {
            self.member_repository
                .stats_editor(&updated.member_id, MEMBER_ARTICLES, -1)
                .await?;
        }

        self.view_of(&id, Some(me.clone())).await
    }

    pub async fn get_board_articles(
        &self,
        viewer: Option<Thing>,
        inquiry: BoardArticlesInquiry,
    ) -> CtxResult<Listing<BoardArticleView>> {
        inquiry.validate()?;
        let pagination = sorted_pagination(
            inquiry.page,
            inquiry.limit,
            inquiry.sort.as_deref(),
            inquiry.direction,
            SORT_FIELDS,
        )?;

        let mut conditions = QryConditions::new();
        conditions.push("article_status = 'ACTIVE'");
        if let Some(category) = inquiry.search.article_category {
            conditions.push_bound(
                "article_category = $article_category",
                "article_category",
                category,
            )?;
        }
        if let Some(member_id) = inquiry.search.member_id {
            let member = get_table_thing(MEMBER_TABLE_NAME, &member_id)
                .map_err(|e| self.ctx.to_ctx_error(e))?;
            conditions.push_bound("member_id = <record>$member_id", "member_id", member.to_raw())?;
        }
        if let Some(text) = inquiry.search.text.filter(|t| !t.trim().is_empty()) {
            conditions.push_bound(
                "string::contains(string::lowercase(article_title), $text)",
                "text",
                text.trim().to_lowercase(),
            )?;
        }

        self.article_repository
            .get_list(conditions, &pagination, viewer)
            .await
    }

    pub async fn mark_target_board_article(
        &self,
        me: &Thing,
        id: &Thing,
    ) -> CtxResult<BoardArticleView> {
        self.member_repository.must_be_active(me, &[]).await?;
        self.article_repository
            .get_active(id)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))?;

        self.mark_service
            .toggle_target::<BoardArticle>(me, id, MarkGroup::Article)
            .await?;

        self.view_of(id, Some(me.clone())).await
    }

    pub async fn get_all_board_articles_by_admin(
        &self,
        admin: &Thing,
        inquiry: AllBoardArticlesInquiry,
    ) -> CtxResult<Listing<BoardArticleView>> {
        inquiry.validate()?;
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let pagination = sorted_pagination(
            inquiry.page,
            inquiry.limit,
            inquiry.sort.as_deref(),
            inquiry.direction,
            SORT_FIELDS,
        )?;

        let mut conditions = QryConditions::new();
        if let Some(status) = inquiry.search.article_status {
            conditions.push_bound("article_status = $article_status", "article_status", status)?;
        }
        if let Some(category) = inquiry.search.article_category {
            conditions.push_bound(
                "article_category = $article_category",
                "article_category",
                category,
            )?;
        }

        self.article_repository
            .get_list(conditions, &pagination, None)
            .await
    }

    pub async fn update_board_article_by_admin(
        &self,
        admin: &Thing,
        input: BoardArticleUpdateInput,
    ) -> CtxResult<BoardArticleView> {
        input.validate()?;
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let id = self.parse_id(&input.id)?;
        let was_active = self.article_repository.get_active(&id).await?.is_some();

        let status = input.article_status;
        let updated = self
            .article_repository
            .update(&id, update_data(input))
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::UpdateFailed))?;

        let modifier = match (was_active, status) {
            (true, Some(BoardArticleStatus::Delete)) => -1,
            (false, Some(BoardArticleStatus::Active)) => 1,
            _ => 0,
        };
        if modifier != 0 {
            self.member_repository
                .stats_editor(&updated.member_id, MEMBER_ARTICLES, modifier)
                .await?;
        }

        self.view_of(&id, None).await
    }

    pub async fn remove_board_article_by_admin(
        &self,
        admin: &Thing,
        id: &Thing,
    ) -> CtxResult<RemovedView> {
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let removed = self
            .article_repository
            .remove_deleted(id)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::RemoveFailed))?;
        info!("board article {} removed by admin {admin}", removed.id);
        Ok(RemovedView { id: removed.id })
    }

    async fn view_of(&self, id: &Thing, viewer: Option<Thing>) -> CtxResult<BoardArticleView> {
        self.article_repository
            .get_view(id, viewer)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))
    }
}

fn update_data(input: BoardArticleUpdateInput) -> UpdateBoardArticleData {
    UpdateBoardArticleData {
        article_category: input.article_category,
        article_status: input.article_status,
        article_title: input.article_title.map(|t| t.trim().to_string()),
        article_content: input.article_content,
        article_image: input.article_image,
    }
}
