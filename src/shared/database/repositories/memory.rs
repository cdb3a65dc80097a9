use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use super::auth::{PendingUser, UserStore};
use super::recipe::{IngredientStore, RecipeStore};
use crate::domains::auth::models::user::{NewUser, User, DEFAULT_ROLE};
use crate::domains::ingredient::models::Ingredient;
use crate::domains::recipe::models::{GeneratedRecipe, StoredRecipe, StoredRecipeIngredient};

/// 메모리 사용자 저장소 (테스트 / 로컬 실행용)
/// In-memory credential store for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }

    /// 저장된 사용자 스냅샷
    pub fn get(&self, email: &str) -> Option<User> {
        self.users.lock().values().find(|u| u.email == email).cloned()
    }

    /// 테스트에서 만료 시각 등을 직접 조작할 때 사용
    pub fn update<F: FnOnce(&mut User)>(&self, email: &str, f: F) -> bool {
        let mut users = self.users.lock();
        match users.values_mut().find(|u| u.email == email) {
            Some(user) => {
                f(user);
                true
            }
            None => false,
        }
    }
}

struct MemoryPendingUser {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    user: User,
    committed: bool,
}

#[async_trait]
impl PendingUser for MemoryPendingUser {
    fn user(&self) -> &User {
        &self.user
    }

    async fn commit(&mut self) -> Result<()> {
        if self.committed {
            bail!("User creation already committed");
        }

        let mut users = self.users.lock();
        if users.values().any(|u| u.email == self.user.email) {
            bail!("Email already registered: {}", self.user.email);
        }
        users.insert(self.user.id, self.user.clone());
        self.committed = true;
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.get(email))
    }

    async fn begin_create(&self, new_user: NewUser) -> Result<Option<Box<dyn PendingUser>>> {
        if self.users.lock().values().any(|u| u.email == new_user.email) {
            return Ok(None);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: DEFAULT_ROLE.to_string(),
            verified: false,
            verification_token: Some(new_user.verification_token),
            verification_token_expires_at: Some(new_user.verification_token_expires_at),
            reset_token: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };

        Ok(Some(Box::new(MemoryPendingUser {
            users: self.users.clone(),
            user,
            committed: false,
        })))
    }

    async fn verify_email(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<User>> {
        let mut users = self.users.lock();
        let user = users.values_mut().find(|u| {
            u.verification_token.as_deref() == Some(token_hash)
                && u.verification_token_expires_at.map_or(false, |exp| exp > now)
        });

        Ok(user.map(|user| {
            user.verified = true;
            user.verification_token = None;
            user.verification_token_expires_at = None;
            user.updated_at = now;
            user.clone()
        }))
    }

    async fn set_verification_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(user) = self.users.lock().get_mut(&user_id) {
            user.verification_token = Some(token_hash.to_string());
            user.verification_token_expires_at = Some(expires_at);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(user) = self.users.lock().get_mut(&user_id) {
            user.reset_token = Some(token_hash.to_string());
            user.reset_token_expires_at = Some(expires_at);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn reset_password(
        &self,
        email: &str,
        token_hash: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut users = self.users.lock();
        let user = users.values_mut().find(|u| {
            u.email == email
                && u.reset_token.as_deref() == Some(token_hash)
                && u.reset_token_expires_at.map_or(false, |exp| exp > now)
        });

        Ok(match user {
            Some(user) => {
                user.password_hash = new_password_hash.to_string();
                user.reset_token = None;
                user.reset_token_expires_at = None;
                user.updated_at = now;
                true
            }
            None => false,
        })
    }
}

#[derive(Default)]
struct RecipeTables {
    recipes: HashMap<(Uuid, String), StoredRecipe>,
    ingredients: BTreeMap<String, Ingredient>,
}

/// 메모리 레시피 + 재료 저장소
/// In-memory recipe storage, also serving the ingredient catalogue
#[derive(Clone, Default)]
pub struct InMemoryRecipeStore {
    tables: Arc<Mutex<RecipeTables>>,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recipe_count(&self) -> usize {
        self.tables.lock().recipes.len()
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn exists(&self, user_id: Uuid, slug: &str) -> Result<bool> {
        Ok(self
            .tables
            .lock()
            .recipes
            .contains_key(&(user_id, slug.to_string())))
    }

    async fn save(
        &self,
        user_id: Uuid,
        slug: &str,
        recipe: &GeneratedRecipe,
    ) -> Result<Option<StoredRecipe>> {
        let mut tables = self.tables.lock();
        let key = (user_id, slug.to_string());
        if tables.recipes.contains_key(&key) {
            return Ok(None);
        }

        let mut ingredients = Vec::with_capacity(recipe.ingredients.len());
        for item in &recipe.ingredients {
            let ingredient = Ingredient::from_name(&item.name);
            let entry = tables
                .ingredients
                .entry(ingredient.slug.clone())
                .or_insert(ingredient);

            ingredients.push(StoredRecipeIngredient {
                ingredient_slug: entry.slug.clone(),
                name: entry.name.clone(),
                quantity: item.quantity,
                measure: item.measure,
            });
        }

        let now = Utc::now();
        let stored = StoredRecipe {
            slug: slug.to_string(),
            name: recipe.recipe_name.clone(),
            country: recipe.country.clone(),
            time_in_minutes: recipe.time_in_minutes,
            steps: recipe.steps.clone(),
            user_id,
            ingredients,
            created_at: now,
            updated_at: now,
        };
        tables.recipes.insert(key, stored.clone());

        Ok(Some(stored))
    }

    async fn find_by_slug(&self, user_id: Uuid, slug: &str) -> Result<Option<StoredRecipe>> {
        Ok(self
            .tables
            .lock()
            .recipes
            .get(&(user_id, slug.to_string()))
            .cloned())
    }

    async fn find_all(&self, user_id: Uuid) -> Result<Vec<StoredRecipe>> {
        let mut recipes: Vec<StoredRecipe> = self
            .tables
            .lock()
            .recipes
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }
}

#[async_trait]
impl IngredientStore for InMemoryRecipeStore {
    async fn find_all(&self) -> Result<Vec<Ingredient>> {
        let mut ingredients: Vec<Ingredient> =
            self.tables.lock().ingredients.values().cloned().collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ingredients)
    }
}
