use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};
use time::OffsetDateTime;

/// UTC timestamp stored as INTEGER unix nanoseconds.
///
/// Integer storage lets updates advance `updated_at` in SQL.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DTimestamp(OffsetDateTime);

impl From<DTimestamp> for OffsetDateTime {
    fn from(val: DTimestamp) -> Self {
        val.0
    }
}

impl From<OffsetDateTime> for DTimestamp {
    fn from(ts: OffsetDateTime) -> Self {
        Self(ts)
    }
}

impl Decode<'_, Sqlite> for DTimestamp {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let nanos = <i64 as Decode<Sqlite>>::decode(value)?;
        let ts = OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))?;
        Ok(Self(ts))
    }
}

impl Encode<'_, Sqlite> for DTimestamp {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        let nanos = i64::try_from(self.0.unix_timestamp_nanos())?;
        args.push(SqliteArgumentValue::Int64(nanos));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DTimestamp {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }
}
