use super::error::DomainError;
use super::identity::Identity;

/// Ресурс, у которого есть владелец.
pub(crate) trait Owned {
    fn owner(&self) -> &Identity;
}

/// Разрешает изменение ресурса только его владельцу.
///
/// Вызывается строго после загрузки ресурса: отсутствие ресурса
/// обрабатывается раньше и даёт `NotFound`, а не `Forbidden`.
pub(crate) fn ensure_owner<R: Owned + ?Sized>(
    caller: &Identity,
    resource: &R,
) -> Result<(), DomainError> {
    if resource.owner() != caller {
        return Err(DomainError::Forbidden);
    }
    Ok(())
}
