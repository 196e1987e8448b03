use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("DynamoDB {operation} failed: {message}")]
	Dynamo { operation: &'static str, message: String },
	#[error("Invalid item: {0}")]
	InvalidItem(String),
}
impl Error {
	pub(crate) fn dynamo<E, R>(operation: &'static str, err: SdkError<E, R>) -> Self
	where
		E: std::error::Error + 'static,
		R: std::fmt::Debug + 'static,
	{
		Self::Dynamo { operation, message: DisplayErrorContext(&err).to_string() }
	}
}
