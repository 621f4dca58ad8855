use error_stack::Report;

use kernel::KernelError;

pub(crate) trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, sqlx::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                sqlx::Error::Database(inner) if inner.is_unique_violation() => {
                    KernelError::Duplicated
                }
                sqlx::Error::Database(inner) if inner.is_foreign_key_violation() => {
                    KernelError::NotFound
                }
                _ => KernelError::Database,
            };
            Report::from(error).change_context(context)
        })
    }
}

impl<T> ConvertError for Result<T, dotenvy::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::from(error).change_context(KernelError::Database))
    }
}
