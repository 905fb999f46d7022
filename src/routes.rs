use actix_web::{delete, get, post, web, HttpResponse};

use crate::auth::AuthenticatedUser;
use crate::breakdown::compute_category_breakdown;
use crate::error::ApiError;
use crate::filter::{self, ExpenseFilter, FilterParams};
use crate::schemas::{Expense, NewExpense};
use crate::store::ExpenseStore;

type Store = web::Data<dyn ExpenseStore>;

#[get("/hello")]
async fn hello() -> HttpResponse {
    HttpResponse::Ok().json("Hello world")
}

#[get("/expenses")]
async fn list_expenses(user: AuthenticatedUser, store: Store) -> Result<HttpResponse, ApiError> {
    let expenses = store.find(&user.0, &ExpenseFilter::All).await?;
    Ok(HttpResponse::Ok().json(expenses))
}

#[post("/expenses")]
async fn create_expense(
    user: AuthenticatedUser,
    store: Store,
    json: web::Json<NewExpense>,
) -> Result<HttpResponse, ApiError> {
    let expense = Expense::new(&user.0, json.into_inner())?;
    let expense = store.insert(expense).await?;
    tracing::info!(user = %user.0, id = %expense.id, "expense added");
    Ok(HttpResponse::Created().json(expense))
}

#[get("/expenses/category")]
async fn get_expenses_by_category(
    user: AuthenticatedUser,
    store: Store,
    params: web::Query<FilterParams>,
) -> Result<HttpResponse, ApiError> {
    let filter = filter::resolve_category(&params)?;
    Ok(HttpResponse::Ok().json(store.find(&user.0, &filter).await?))
}

#[get("/expenses/interval")]
async fn get_expenses_by_date_interval(
    user: AuthenticatedUser,
    store: Store,
    params: web::Query<FilterParams>,
) -> Result<HttpResponse, ApiError> {
    let filter = filter::resolve_interval(&params)?;
    Ok(HttpResponse::Ok().json(store.find(&user.0, &filter).await?))
}

#[get("/expenses/filter")]
async fn get_filtered_expenses(
    user: AuthenticatedUser,
    store: Store,
    params: web::Query<FilterParams>,
) -> Result<HttpResponse, ApiError> {
    let filter = filter::resolve(&params)?;
    Ok(HttpResponse::Ok().json(store.find(&user.0, &filter).await?))
}

#[get("/expenses/category/percentage")]
async fn get_expense_percentage_by_category(
    user: AuthenticatedUser,
    store: Store,
) -> Result<HttpResponse, ApiError> {
    let expenses = store.find(&user.0, &ExpenseFilter::All).await?;
    Ok(HttpResponse::Ok().json(compute_category_breakdown(&expenses)?))
}

#[delete("/expenses/{id}")]
async fn delete_expense(
    user: AuthenticatedUser,
    store: Store,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    if !store.delete(&user.0, &id).await? {
        return Err(ApiError::NotFound("Expense not found".to_string()));
    }
    tracing::info!(user = %user.0, %id, "expense deleted");
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::InvalidExpense(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::InvalidParameter(err.to_string()).into()
    }))
    .service(hello)
    .service(list_expenses)
    .service(create_expense)
    .service(get_expenses_by_category)
    .service(get_expenses_by_date_interval)
    .service(get_filtered_expenses)
    .service(get_expense_percentage_by_category)
    .service(delete_expense);
}
