mod common;

use query_engine_translation::translation::helpers::Env;
use query_engine_translation::translation::query::compile;

#[tokio::test]
async fn select_users_default() {
    common::test_translation("users_default").await.unwrap();
}

#[tokio::test]
async fn select_nested_order() {
    common::test_translation("nested_order").await.unwrap();
}

#[tokio::test]
async fn select_unknown_references() {
    common::test_translation("unknown_references").await.unwrap();
}

#[tokio::test]
async fn select_single_record() {
    common::test_translation("single_record").await.unwrap();
}

#[tokio::test]
async fn compiling_twice_gives_the_same_plan() {
    let (metadata, pagination) = common::load_configuration().await.unwrap();
    let request = common::read_request("nested_order", pagination).unwrap();

    let env = Env::new(&metadata);
    let entity = env.lookup_entity(&request.entity).unwrap();
    let tree = request.options.intent_tree();

    let first = compile(&env, entity, &tree, &request.options);
    let second = compile(&env, entity, &tree, &request.options);
    similar_asserts::assert_eq!(first, second);
}
