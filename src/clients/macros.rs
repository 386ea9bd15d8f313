/// Generates `get_<name>` and `list_<name>s` on a client wrapping a
/// `CollectionClient` in its `inner` field. Store errors go through the
/// client's `From<StoreError>` conversion.
#[macro_export]
macro_rules! impl_client_methods {
    ($client_name:ident, $document:ty, $error:ty, $name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self, id), fields(id = %id))]
                pub async fn [<get_ $name_snake>](
                    &self,
                    id: <$document as $crate::actor_framework::Document>::Id,
                ) -> Result<Option<$document>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.find_one(id).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<list_ $name_snake s>](&self) -> Result<Vec<$document>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.find_many().await.map_err(<$error>::from)
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_client_new {
    ($client_name:ident, $document:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::CollectionClient<$document>) -> Self {
                Self { inner }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_basic_client {
    ($client_name:ident, $document:ty, $error:ty, $name_snake:ident) => {
        $crate::impl_client_new!($client_name, $document);
        $crate::impl_client_methods!($client_name, $document, $error, $name_snake);
    };
}
