use super::*;

#[tokio::test]
async fn stores_and_clears_user_id() -> Result<(), AppError> {
    let mut test = TestBuilder::new().build().await.unwrap();
    let session = test.session().await.unwrap();

    let auth_session = AuthSession::new(session);
    assert_eq!(auth_session.get_user_id().await?, None);

    auth_session.set_user_id(7).await?;
    assert_eq!(auth_session.get_user_id().await?, Some(7));

    auth_session.clear().await;
    assert_eq!(auth_session.get_user_id().await?, None);

    Ok(())
}

#[tokio::test]
async fn cycling_id_keeps_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().build().await.unwrap();
    let session = test.session().await.unwrap();

    let auth_session = AuthSession::new(session);
    auth_session.set_user_id(11).await?;
    auth_session.cycle_id().await?;

    assert_eq!(auth_session.get_user_id().await?, Some(11));

    Ok(())
}
